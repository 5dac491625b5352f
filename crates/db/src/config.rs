//! Provider selection and settings handed to provider constructors.

use std::fmt;
use std::str::FromStr;

use espyna_core::transaction::DEFAULT_MAX_ATTEMPTS;

/// Connection settings passed to database providers.
///
/// The in-memory provider ignores them; they exist so that real drivers
/// can be registered without changing the configuration surface.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            name: "espyna".into(),
            user: "espyna".into(),
            password: None,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Database provider name (`PROVIDER_PRIMARY`).
    pub primary: String,
    /// Authorization provider name (`PROVIDER_AUTH`).
    pub auth: String,
    /// Grants for the `static` authorizer, `user=perm,perm;user2=*`.
    pub auth_grants: String,
    pub database: DatabaseSettings,
    pub transaction_max_attempts: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            primary: "mock".into(),
            auth: "allow_all".into(),
            auth_grants: String::new(),
            database: DatabaseSettings::default(),
            transaction_max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ProviderConfig {
    /// Load from environment variables with defaults.
    ///
    /// | Env Var                    | Default     |
    /// |----------------------------|-------------|
    /// | `PROVIDER_PRIMARY`         | `mock`      |
    /// | `PROVIDER_AUTH`            | `allow_all` |
    /// | `AUTH_GRANTS`              | empty       |
    /// | `DATABASE_HOST`            | `localhost` |
    /// | `DATABASE_PORT`            | `5432`      |
    /// | `DATABASE_NAME`            | `espyna`    |
    /// | `DATABASE_USER`            | `espyna`    |
    /// | `DATABASE_PASSWORD`        | unset       |
    /// | `TRANSACTION_MAX_ATTEMPTS` | `3`         |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparsable numbers fall back to
    /// their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            primary: text("PROVIDER_PRIMARY", &defaults.primary),
            auth: text("PROVIDER_AUTH", &defaults.auth),
            auth_grants: text("AUTH_GRANTS", ""),
            database: DatabaseSettings {
                host: text("DATABASE_HOST", &defaults.database.host),
                port: parsed(&lookup, "DATABASE_PORT", defaults.database.port),
                name: text("DATABASE_NAME", &defaults.database.name),
                user: text("DATABASE_USER", &defaults.database.user),
                password: lookup("DATABASE_PASSWORD").filter(|p| !p.is_empty()),
            },
            transaction_max_attempts: parsed(
                &lookup,
                "TRANSACTION_MAX_ATTEMPTS",
                defaults.transaction_max_attempts,
            )
            .max(1),
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ProviderConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProviderConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), ProviderConfig::default());
        assert_eq!(ProviderConfig::default().primary, "mock");
        assert_eq!(ProviderConfig::default().auth, "allow_all");
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("PROVIDER_PRIMARY", "postgres"),
            ("PROVIDER_AUTH", "static"),
            ("AUTH_GRANTS", "alice=*"),
            ("DATABASE_PORT", "6543"),
            ("DATABASE_PASSWORD", "hunter2"),
            ("TRANSACTION_MAX_ATTEMPTS", "5"),
        ]);
        assert_eq!(cfg.primary, "postgres");
        assert_eq!(cfg.auth, "static");
        assert_eq!(cfg.auth_grants, "alice=*");
        assert_eq!(cfg.database.port, 6543);
        assert_eq!(cfg.database.password.as_deref(), Some("hunter2"));
        assert_eq!(cfg.transaction_max_attempts, 5);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config(&[("DATABASE_PORT", "abc"), ("TRANSACTION_MAX_ATTEMPTS", "0")]);
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.transaction_max_attempts, 1);
    }

    #[test]
    fn blank_names_use_defaults() {
        let cfg = config(&[("PROVIDER_PRIMARY", "  ")]);
        assert_eq!(cfg.primary, "mock");
    }

    #[test]
    fn debug_redacts_password() {
        let cfg = config(&[("DATABASE_PASSWORD", "hunter2")]);
        let printed = format!("{:?}", cfg.database);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
