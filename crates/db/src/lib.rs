//! Espyna persistence layer.
//!
//! Entity models, repository adapters, and the provider registry that picks
//! a database and an authorizer by name at startup. The in-memory `mock`
//! database is compiled in with the `mock_db` feature (on by default).

pub mod config;
pub mod models;
pub mod provider;
pub mod registry;
pub mod repositories;
#[cfg(feature = "mock_db")]
pub mod transaction;

pub use config::{DatabaseSettings, ProviderConfig};
#[cfg(feature = "mock_db")]
pub use provider::MemoryDatabase;
pub use provider::{DatabaseProvider, Repositories, RepositoryFor};
pub use registry::{ProviderRegistry, Providers, Registry, RegistryError};
