use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use espyna_core::error::CoreError;
use espyna_core::messages::{display_name, render};
use serde::Serialize;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the JSON error envelope
/// `{ "error", "code", "key"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A malformed request (bad JSON, bad header) with a readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, key) = match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    let key = format!("{entity}.errors.not_found");
                    let message = render(&key, &[("entity", &display_name(entity)), ("id", &id)]);
                    (StatusCode::NOT_FOUND, "NOT_FOUND", message, Some(key))
                }
                CoreError::Validation { key, message } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, Some(key))
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None)
                }
                CoreError::Forbidden { key, message } => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", message, Some(key))
                }
                CoreError::Transaction(err) if err.is_retryable() => {
                    tracing::warn!(kind = %err.kind, error = %err.message, "Retryable transaction failure");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "TRANSACTION_RETRYABLE",
                        format!("The operation hit a transient {} error, please retry", err.kind),
                        None,
                    )
                }
                CoreError::Transaction(err) => {
                    tracing::error!(kind = %err.kind, code = ?err.code, error = %err.message, "Transaction failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "TRANSACTION_FAILED",
                        "The operation could not be completed".to_string(),
                        None,
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                        None,
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
        };

        let body = ErrorBody {
            error: message,
            code,
            key,
        };
        (status, axum::Json(body)).into_response()
    }
}
