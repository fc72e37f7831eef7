use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookstore_kernel::{settings::Settings, InitCtx};
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: serde_json::Value,
}

/// Router over fresh stores for the given modules, optionally seeded.
pub async fn app(modules: &[&str], seed: bool) -> Router {
    let mut settings = Settings::default();
    settings.modules.enabled = modules.iter().map(|name| name.to_string()).collect();

    let registry = bookstore_app::build_registry(&settings).unwrap();
    registry
        .init_modules(&InitCtx {
            settings: &settings,
        })
        .await
        .unwrap();
    if seed {
        registry.seed_modules().await.unwrap();
    }

    bookstore_http::build_router(&registry, &settings)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    TestResponse {
        status,
        location,
        body,
    }
}
