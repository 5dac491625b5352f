#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use espyna_api::config::ServerConfig;
use espyna_api::router::build_app_router;
use espyna_api::services::Services;
use espyna_api::state::AppState;
use espyna_core::auth::{AllowAllAuthorizer, Authorizer};
use espyna_db::{DatabaseProvider, MemoryDatabase, ProviderConfig, ProviderRegistry, Providers};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        providers: ProviderConfig::default(),
    }
}

/// The full router over a fresh in-memory database that allows every request.
pub fn build_test_app() -> Router {
    build_test_app_with(ProviderConfig::default())
}

/// The full router with providers resolved by name through the registry.
pub fn build_test_app_with(providers: ProviderConfig) -> Router {
    let registry = ProviderRegistry::with_builtin().unwrap();
    let built = registry.build(&providers).unwrap();
    let mut config = test_config();
    config.providers = providers;
    app_from(built, config)
}

/// The full router over a caller-owned database, e.g. to script commit failures.
pub fn build_test_app_on(database: Arc<MemoryDatabase>, max_attempts: u32) -> Router {
    let providers = Providers {
        database: database as Arc<dyn DatabaseProvider>,
        authorizer: Arc::new(AllowAllAuthorizer) as Arc<dyn Authorizer>,
    };
    let mut config = test_config();
    config.providers.transaction_max_attempts = max_attempts;
    app_from(providers, config)
}

fn app_from(providers: Providers, config: ServerConfig) -> Router {
    let services = Services::new(&providers, config.providers.transaction_max_attempts);
    let state = AppState {
        services: Arc::new(services),
        database: providers.database,
    };
    build_app_router(state, &config)
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_with_headers(app, uri, body, &[]).await
}

pub async fn post_json_with_headers(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a record and return its JSON representation.
pub async fn create(app: &Router, path: &str, data: serde_json::Value) -> serde_json::Value {
    let response = post_json(
        app.clone(),
        &format!("{path}/create"),
        serde_json::json!({ "data": data }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
