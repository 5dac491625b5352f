//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use espyna_api::error::AppError;
use espyna_core::error::CoreError;
use espyna_core::transaction::{TransactionError, TransactionErrorKind};
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_renders_message_and_key() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "subscription",
        id: "sub-42".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Subscription with ID 'sub-42' not found");
    assert_eq!(json["key"], "subscription.errors.not_found");
}

#[tokio::test]
async fn validation_error_returns_400_with_key() {
    let err = AppError::Core(CoreError::validation(
        "payment.validation.id_required",
        &[("entity", "Payment")],
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Payment ID is required");
    assert_eq!(json["key"], "payment.validation.id_required");
}

#[tokio::test]
async fn bad_request_has_no_key() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid JSON".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid JSON");
    assert!(json.get("key").is_none());
}

#[tokio::test]
async fn conflict_returns_409() {
    let err = AppError::Core(CoreError::Conflict("duplicate id".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "duplicate id");
}

#[tokio::test]
async fn unauthorized_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("missing user".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forbidden_returns_403_with_key() {
    let err = AppError::Core(CoreError::forbidden(
        "client.errors.authorization_failed",
        &[("action", "delete"), ("entity", "Client")],
    ));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Not allowed to delete Client records");
    assert_eq!(json["key"], "client.errors.authorization_failed");
}

#[tokio::test]
async fn retryable_transaction_failure_returns_503() {
    let err = AppError::Core(CoreError::Transaction(TransactionError::new(
        TransactionErrorKind::Deadlock,
        "deadlock detected",
    )));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "TRANSACTION_RETRYABLE");
    assert_eq!(
        json["error"],
        "The operation hit a transient deadlock error, please retry"
    );
}

#[tokio::test]
async fn permanent_transaction_failure_hides_details() {
    let err = AppError::Core(CoreError::Transaction(TransactionError::new(
        TransactionErrorKind::ConstraintViolation,
        "violates foreign key constraint \"fk_client\"",
    )));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "TRANSACTION_FAILED");
    assert_eq!(json["error"], "The operation could not be completed");
}

#[tokio::test]
async fn internal_errors_do_not_leak_details() {
    let err = AppError::Core(CoreError::Internal("pool exhausted at 10.0.0.3".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
