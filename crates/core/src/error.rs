use crate::messages;
use crate::transaction::TransactionError;
use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// `key` is the dotted message path, e.g. `payment.validation.id_required`.
    #[error("Validation failed: {message}")]
    Validation { key: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {message}")]
    Forbidden { key: String, message: String },

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a validation error whose message is rendered from `key`.
    pub fn validation(key: impl Into<String>, params: &[(&str, &str)]) -> Self {
        let key = key.into();
        let message = messages::render(&key, params);
        CoreError::Validation { key, message }
    }

    /// Build a forbidden error whose message is rendered from `key`.
    pub fn forbidden(key: impl Into<String>, params: &[(&str, &str)]) -> Self {
        let key = key.into();
        let message = messages::render(&key, params);
        CoreError::Forbidden { key, message }
    }

    /// The dotted message key, for variants that carry one.
    pub fn key(&self) -> Option<&str> {
        match self {
            CoreError::Validation { key, .. } | CoreError::Forbidden { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transaction(err) if err.is_retryable())
    }
}
