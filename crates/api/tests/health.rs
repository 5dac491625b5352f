//! Tests for the health endpoint and general HTTP behaviour.

#![cfg(feature = "mock_db")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, post_json};
use espyna_core::transaction::TransactionErrorKind;
use espyna_db::MemoryDatabase;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_reports_provider() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["provider"], "mock");
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn operations_only_accept_post() {
    let app = common::build_test_app();
    let response = get(app, "/api/entity/client/list").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn response_contains_generated_request_id() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn incoming_request_id_is_propagated() {
    let app = common::build_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-abc-123");
}

#[tokio::test]
async fn cors_preflight_allows_context_headers() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/entity/client/create")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type,x-tenant-id")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "http://localhost:5173"
    );
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.contains("x-tenant-id"));
}

#[tokio::test]
async fn retryable_commit_failure_is_retried() {
    let database = Arc::new(MemoryDatabase::new());
    let app = common::build_test_app_on(Arc::clone(&database), 3);
    let created = common::create(&app, "/api/workflow/workflow", json!({ "name": "Renewals" })).await;
    assert_eq!(database.mock_transactions().begins(), 1);

    database
        .mock_transactions()
        .fail_next_commit(TransactionErrorKind::SerializationFailure)
        .await;
    let mut changed = created.clone();
    changed["name"] = json!("Renewals v2");
    let response = post_json(
        app,
        "/api/workflow/workflow/update",
        json!({ "data": changed }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Renewals v2");
    assert_eq!(database.mock_transactions().begins(), 3);
    assert_eq!(database.mock_transactions().commits(), 3);
}

#[tokio::test]
async fn exhausted_retries_return_503() {
    let database = Arc::new(MemoryDatabase::new());
    database
        .mock_transactions()
        .fail_next_commit(TransactionErrorKind::Deadlock)
        .await;
    let app = common::build_test_app_on(database, 1);

    let response = post_json(
        app,
        "/api/workflow/workflow/create",
        json!({ "data": { "name": "Renewals" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "TRANSACTION_RETRYABLE");
}

#[tokio::test]
async fn retried_create_succeeds_without_duplicate() {
    let database = Arc::new(MemoryDatabase::new());
    database
        .mock_transactions()
        .fail_next_commit(TransactionErrorKind::SerializationFailure)
        .await;
    let app = common::build_test_app_on(Arc::clone(&database), 3);

    let response = post_json(
        app.clone(),
        "/api/workflow/workflow/create",
        json!({ "data": { "id": "wf-002", "name": "Renewals" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(database.mock_transactions().begins(), 2);

    let response = post_json(app, "/api/workflow/workflow/list", json!({})).await;
    let listed = body_json(response).await["data"].clone();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], "wf-002");
}

#[tokio::test]
async fn failed_commit_leaves_nothing_stored() {
    let database = Arc::new(MemoryDatabase::new());
    database
        .mock_transactions()
        .fail_next_commit(TransactionErrorKind::Unknown)
        .await;
    let app = common::build_test_app_on(Arc::clone(&database), 3);

    let response = post_json(
        app.clone(),
        "/api/workflow/workflow/create",
        json!({ "data": { "id": "wf-001", "name": "Renewals" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "TRANSACTION_FAILED");

    let response = post_json(app.clone(), "/api/workflow/workflow/list", json!({})).await;
    assert_eq!(body_json(response).await["data"], json!([]));

    let response = post_json(
        app,
        "/api/workflow/workflow/read",
        json!({ "data": { "id": "wf-001" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
