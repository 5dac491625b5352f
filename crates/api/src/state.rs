use std::sync::Arc;

use espyna_db::DatabaseProvider;

use crate::services::Services;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    /// The active database provider, consulted by the health check.
    pub database: Arc<dyn DatabaseProvider>,
}
