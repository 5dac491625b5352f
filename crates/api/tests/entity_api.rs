//! HTTP-level tests for the per-entity operation routes.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`;
//! the router is cloned between requests so they share one in-memory store.

#![cfg(feature = "mock_db")]

mod common;

use axum::http::StatusCode;
use common::{body_json, create, post_json, post_json_with_headers};
use espyna_db::ProviderConfig;
use serde_json::json;

const CLIENTS: &str = "/api/entity/client";
const PRODUCTS: &str = "/api/product/product";
const PAYMENTS: &str = "/api/payment/payment";
const SUBSCRIPTIONS: &str = "/api/subscription/subscription";
const WORKFLOWS: &str = "/api/workflow/workflow";

fn acme() -> serde_json::Value {
    json!({ "name": "Acme Corp", "email": "billing@acme.test" })
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_client_returns_201_with_enriched_record() {
    let app = common::build_test_app();
    let response = post_json(app, &format!("{CLIENTS}/create"), json!({ "data": acme() })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["name"], "Acme Corp");
    assert_eq!(data["active"], true);
    assert!(!data["id"].as_str().unwrap().is_empty());
    assert!(data["date_created"].is_string());
    assert_eq!(data["date_created"], data["date_modified"]);
}

#[tokio::test]
async fn create_keeps_a_caller_supplied_id() {
    let app = common::build_test_app();
    let mut client = acme();
    client["id"] = json!("client-001");
    let created = create(&app, CLIENTS, client).await;
    assert_eq!(created["id"], "client-001");
}

#[tokio::test]
async fn read_returns_the_created_record() {
    let app = common::build_test_app();
    let created = create(&app, CLIENTS, acme()).await;

    let response = post_json(
        app,
        &format!("{CLIENTS}/read"),
        json!({ "data": { "id": created["id"] } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], created);
}

#[tokio::test]
async fn read_missing_record_returns_404_envelope() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("{PRODUCTS}/read"),
        json!({ "data": { "id": "prod-missing" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["key"], "product.errors.not_found");
    assert_eq!(json["error"], "Product with ID 'prod-missing' not found");
}

#[tokio::test]
async fn duplicate_id_returns_409() {
    let app = common::build_test_app();
    let mut client = acme();
    client["id"] = json!("client-001");
    create(&app, CLIENTS, client.clone()).await;

    let response = post_json(app, &format!("{CLIENTS}/create"), json!({ "data": client })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Client with ID 'client-001' already exists");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_read_id_is_a_validation_error() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("{PAYMENTS}/read"),
        json!({ "data": { "id": "  " } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["key"], "payment.validation.id_required");
    assert_eq!(json["error"], "Payment ID is required");
}

#[tokio::test]
async fn invalid_field_reports_its_key() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("{PRODUCTS}/create"),
        json!({ "data": { "name": "Widget", "price": 10.0, "currency": "usd" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["key"], "product.validation.currency_invalid");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("{CLIENTS}/create"),
        json!({ "data": { "name": 42 } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Update / delete / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_preserves_creation_date() {
    let app = common::build_test_app();
    let created = create(&app, CLIENTS, acme()).await;

    let mut changed = created.clone();
    changed["name"] = json!("Acme Holdings");
    changed["date_created"] = json!(null);
    let response = post_json(
        app.clone(),
        &format!("{CLIENTS}/update"),
        json!({ "data": changed }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "Acme Holdings");
    assert_eq!(updated["date_created"], created["date_created"]);
}

#[tokio::test]
async fn update_missing_record_returns_404() {
    let app = common::build_test_app();
    let mut client = acme();
    client["id"] = json!("client-404");
    let response = post_json(app, &format!("{CLIENTS}/update"), json!({ "data": client })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_soft_and_hides_record_from_list() {
    let app = common::build_test_app();
    let kept = create(&app, WORKFLOWS, json!({ "name": "Onboarding" })).await;
    let removed = create(&app, WORKFLOWS, json!({ "name": "Offboarding" })).await;

    let response = post_json(
        app.clone(),
        &format!("{WORKFLOWS}/delete"),
        json!({ "data": { "id": removed["id"] } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["success"], true);

    let response = post_json(app.clone(), &format!("{WORKFLOWS}/list"), json!({})).await;
    let listed = body_json(response).await["data"].clone();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], kept["id"]);

    // The record itself is still readable, flagged inactive.
    let response = post_json(
        app,
        &format!("{WORKFLOWS}/read"),
        json!({ "data": { "id": removed["id"] } }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["active"], false);
}

#[tokio::test]
async fn delete_missing_record_returns_404() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("{PAYMENTS}/delete"),
        json!({ "data": { "id": "pay-missing" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entities_are_stored_separately() {
    let app = common::build_test_app();
    create(&app, CLIENTS, acme()).await;
    create(
        &app,
        SUBSCRIPTIONS,
        json!({
            "name": "Acme Pro",
            "client_id": "client-001",
            "product_id": "prod-001",
            "start_date": "2024-03-01T00:00:00Z"
        }),
    )
    .await;

    let response = post_json(app.clone(), &format!("{SUBSCRIPTIONS}/list"), json!({})).await;
    let listed = body_json(response).await["data"].clone();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["status"], "trial");

    let response = post_json(app, &format!("{PRODUCTS}/list"), json!({})).await;
    assert_eq!(body_json(response).await["data"], json!([]));
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deny_all_returns_403_with_key() {
    let app = common::build_test_app_with(ProviderConfig {
        auth: "deny_all".into(),
        ..ProviderConfig::default()
    });
    let response = post_json(app, &format!("{CLIENTS}/create"), json!({ "data": acme() })).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["key"], "client.errors.authorization_failed");
}

#[tokio::test]
async fn static_grants_follow_the_user_header() {
    let app = common::build_test_app_with(ProviderConfig {
        auth: "static".into(),
        auth_grants: "alice=client:*;bob=client:read".into(),
        ..ProviderConfig::default()
    });
    let uri = format!("{CLIENTS}/create");

    let response =
        post_json_with_headers(app.clone(), &uri, json!({ "data": acme() }), &[("x-user-id", "alice")])
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        post_json_with_headers(app.clone(), &uri, json!({ "data": acme() }), &[("x-user-id", "bob")])
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(app, &uri, json!({ "data": acme() })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
