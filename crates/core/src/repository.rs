//! Repository port implemented by every storage adapter.

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::CoreError;
use crate::messages::display_name;
use crate::transaction::TransactionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} with id {id} already exists")]
    Duplicate { entity: &'static str, id: String },

    /// A raw backend failure; `code` is the driver's error code if it has one.
    #[error("Backend error: {message}")]
    Backend {
        code: Option<String>,
        message: String,
    },
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate { entity, id } => CoreError::Conflict(
                crate::messages::render(
                    &format!("{entity}.errors.already_exists"),
                    &[("entity", &display_name(entity)), ("id", &id)],
                ),
            ),
            RepositoryError::Backend { code, message } => {
                CoreError::Transaction(TransactionError::from_backend(code, message))
            }
        }
    }
}

/// Persistence operations for one entity type.
///
/// `soft_delete` and `update` report a missing row as `false` / `None`
/// rather than an error; use cases turn that into `NotFound`.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, entity: E) -> Result<E, RepositoryError>;

    /// Returns inactive (soft-deleted) records too.
    async fn read(&self, id: &str) -> Result<Option<E>, RepositoryError>;

    /// Replace the stored record. The stored active flag and `date_created`
    /// win over the incoming values, so a concurrent soft delete sticks.
    async fn update(&self, entity: E) -> Result<Option<E>, RepositoryError>;

    async fn soft_delete(&self, id: &str) -> Result<bool, RepositoryError>;

    /// All records, oldest first; inactive records only when asked for.
    async fn list(&self, include_inactive: bool) -> Result<Vec<E>, RepositoryError>;
}
