use anyhow::Context;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about = "Bookstore user and book services")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API until Ctrl-C
    Serve {
        /// Comma-separated modules to mount, overriding configuration
        #[arg(long, value_delimiter = ',')]
        modules: Option<Vec<String>>,
        /// Start with empty stores
        #[arg(long)]
        no_seed: bool,
    },
    /// Print the merged OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().context("failed to load bookstore settings")?;

    match cli.command {
        Command::Serve { modules, no_seed } => {
            if let Some(modules) = modules {
                settings.modules.enabled = modules;
            }
            if no_seed {
                settings.storage.seed_on_startup = false;
            }

            bookstore_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                modules = ?settings.modules.enabled,
                "bookstore serve starting"
            );
            bookstore_app::run(settings).await
        }
        Command::Openapi => {
            let registry = bookstore_app::build_registry(&settings)?;
            let document = bookstore_http::router::openapi_document(&registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
    }
}
