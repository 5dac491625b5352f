//! String-keyed provider registry.
//!
//! A [`Registry`] maps provider names to constructors for one provider kind.
//! [`ProviderRegistry`] bundles the database and authorization registries
//! and is built explicitly at startup; there is no global state.

use std::collections::BTreeMap;
use std::sync::Arc;

use espyna_core::auth::{AllowAllAuthorizer, Authorizer, DenyAllAuthorizer, StaticAuthorizer};

use crate::config::ProviderConfig;
use crate::provider::DatabaseProvider;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid {kind} provider name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("{kind} provider '{name}' is already registered")]
    Duplicate { kind: &'static str, name: String },

    #[error("unknown {kind} provider '{name}' (available: {available})")]
    Unknown {
        kind: &'static str,
        name: String,
        available: String,
    },

    #[error("failed to construct {kind} provider '{name}': {reason}")]
    Construction {
        kind: &'static str,
        name: String,
        reason: String,
    },
}

type Constructor<P> =
    Box<dyn Fn(&ProviderConfig) -> Result<Arc<P>, RegistryError> + Send + Sync>;

/// Constructors for one provider kind, keyed by name.
pub struct Registry<P: ?Sized> {
    kind: &'static str,
    constructors: BTreeMap<String, Constructor<P>>,
}

/// Lowercase ASCII letters, digits, `_` and `-`, starting with a letter.
fn is_valid_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

impl<P: ?Sized> Registry<P> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            constructors: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn register<F>(&mut self, name: &str, constructor: F) -> Result<(), RegistryError>
    where
        F: Fn(&ProviderConfig) -> Result<Arc<P>, RegistryError> + Send + Sync + 'static,
    {
        if !is_valid_name(name) {
            return Err(RegistryError::InvalidName {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        if self.constructors.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }

        self.constructors.insert(name.to_string(), Box::new(constructor));
        tracing::debug!(kind = self.kind, name, "Provider registered");
        Ok(())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn build(&self, name: &str, config: &ProviderConfig) -> Result<Arc<P>, RegistryError> {
        let constructor = self.constructors.get(name).ok_or_else(|| RegistryError::Unknown {
            kind: self.kind,
            name: name.to_string(),
            available: self.names().join(", "),
        })?;
        constructor(config)
    }
}

/// The providers resolved from configuration at startup.
#[derive(Clone)]
pub struct Providers {
    pub database: Arc<dyn DatabaseProvider>,
    pub authorizer: Arc<dyn Authorizer>,
}

pub struct ProviderRegistry {
    pub database: Registry<dyn DatabaseProvider>,
    pub auth: Registry<dyn Authorizer>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            database: Registry::new("database"),
            auth: Registry::new("auth"),
        }
    }

    /// A registry holding every adapter compiled into this build.
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        #[cfg(feature = "mock_db")]
        registry
            .database
            .register(crate::provider::MemoryDatabase::NAME, |_| {
                Ok(Arc::new(crate::provider::MemoryDatabase::new()) as Arc<dyn DatabaseProvider>)
            })?;

        registry
            .auth
            .register("allow_all", |_| Ok(Arc::new(AllowAllAuthorizer) as Arc<dyn Authorizer>))?;
        registry
            .auth
            .register("deny_all", |_| Ok(Arc::new(DenyAllAuthorizer) as Arc<dyn Authorizer>))?;
        registry.auth.register("static", |config| {
            StaticAuthorizer::parse(&config.auth_grants)
                .map(|authorizer| Arc::new(authorizer) as Arc<dyn Authorizer>)
                .map_err(|e| RegistryError::Construction {
                    kind: "auth",
                    name: "static".into(),
                    reason: e.to_string(),
                })
        })?;

        Ok(registry)
    }

    /// Resolve the configured provider names.
    pub fn build(&self, config: &ProviderConfig) -> Result<Providers, RegistryError> {
        let database = self.database.build(&config.primary, config)?;
        let authorizer = self.auth.build(&config.auth, config)?;

        tracing::info!(
            database = database.name(),
            auth = authorizer.name(),
            "Providers initialized"
        );
        Ok(Providers {
            database,
            authorizer,
        })
    }
}
