pub mod books;
pub mod users;

use bookstore_kernel::{settings::ModuleSettings, ModuleRegistry};

/// Register the enabled modules with the registry, in configured order
pub fn register_all(registry: &mut ModuleRegistry, settings: &ModuleSettings) -> anyhow::Result<()> {
    for name in &settings.enabled {
        let module = match name.as_str() {
            "users" => users::create_module(),
            "books" => books::create_module(),
            other => anyhow::bail!("unknown module '{other}'; expected users or books"),
        };
        registry.register(module)?;
    }
    Ok(())
}
