//! Authorization port and the built-in adapters.
//!
//! Use cases ask an [`Authorizer`] whether the caller in a
//! [`RequestContext`] may perform an [`Action`] on a resource kind. Policy
//! logic lives behind the trait; the adapters here cover development
//! (allow everything), lock-down (deny everything), and explicit
//! per-user grants.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::CoreError;

/// Operations guarded by an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

/// A `resource:action` pair, e.g. `payment:create`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    pub resource: String,
    pub action: Action,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: Action) -> Self {
        Self {
            resource: resource.into(),
            action,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action.as_str())
    }
}

/// Decides whether a caller may perform an operation.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Stable provider name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Returns `Ok(false)` for a denial; `Err` only when the check itself failed.
    async fn check(&self, ctx: &RequestContext, permission: &Permission)
        -> Result<bool, CoreError>;
}

/// Grants every request.
#[derive(Debug, Default)]
pub struct AllowAllAuthorizer;

#[async_trait]
impl Authorizer for AllowAllAuthorizer {
    fn name(&self) -> &'static str {
        "allow_all"
    }

    async fn check(&self, _: &RequestContext, _: &Permission) -> Result<bool, CoreError> {
        Ok(true)
    }
}

/// Denies every request.
#[derive(Debug, Default)]
pub struct DenyAllAuthorizer;

#[async_trait]
impl Authorizer for DenyAllAuthorizer {
    fn name(&self) -> &'static str {
        "deny_all"
    }

    async fn check(&self, _: &RequestContext, _: &Permission) -> Result<bool, CoreError> {
        Ok(false)
    }
}

/// Explicit per-user grants.
///
/// A grant is a permission string (`payment:create`), a resource wildcard
/// (`payment:*`), or `*` for everything. Anonymous callers are always denied.
#[derive(Debug, Default, Clone)]
pub struct StaticAuthorizer {
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl StaticAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one grant for `user_id`.
    pub fn grant(mut self, user_id: impl Into<String>, grant: impl Into<String>) -> Self {
        self.grants
            .entry(user_id.into())
            .or_default()
            .insert(grant.into());
        self
    }

    /// Parse grants from `user=perm,perm;user2=*`.
    ///
    /// Blank segments are ignored; a segment without `=` is rejected.
    pub fn parse(grants: &str) -> Result<Self, CoreError> {
        let mut authorizer = Self::new();
        for segment in grants.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (user, perms) = segment.split_once('=').ok_or_else(|| {
                CoreError::Internal(format!("Malformed grant '{segment}': expected user=perms"))
            })?;
            let user = user.trim();
            if user.is_empty() {
                return Err(CoreError::Internal(format!(
                    "Malformed grant '{segment}': empty user id"
                )));
            }
            for perm in perms.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                authorizer = authorizer.grant(user, perm);
            }
        }
        Ok(authorizer)
    }

    fn allows(&self, user_id: &str, permission: &Permission) -> bool {
        let Some(grants) = self.grants.get(user_id) else {
            return false;
        };
        grants.contains("*")
            || grants.contains(&format!("{}:*", permission.resource))
            || grants.contains(&permission.to_string())
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn check(&self, ctx: &RequestContext, permission: &Permission) -> Result<bool, CoreError> {
        Ok(ctx
            .user_id
            .as_deref()
            .is_some_and(|user| self.allows(user, permission)))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn ctx(user: &str) -> RequestContext {
        RequestContext::default().with_user(user)
    }

    #[test]
    fn permission_display() {
        let p = Permission::new("payment", Action::Create);
        assert_eq!(p.to_string(), "payment:create");
    }

    #[tokio::test]
    async fn allow_all_allows() {
        let p = Permission::new("payment", Action::Delete);
        assert!(AllowAllAuthorizer.check(&RequestContext::default(), &p).await.unwrap());
    }

    #[tokio::test]
    async fn deny_all_denies() {
        let p = Permission::new("payment", Action::Read);
        assert!(!DenyAllAuthorizer.check(&ctx("alice"), &p).await.unwrap());
    }

    #[tokio::test]
    async fn static_exact_grant() {
        let auth = StaticAuthorizer::new().grant("alice", "payment:read");
        let read = Permission::new("payment", Action::Read);
        let create = Permission::new("payment", Action::Create);
        assert!(auth.check(&ctx("alice"), &read).await.unwrap());
        assert!(!auth.check(&ctx("alice"), &create).await.unwrap());
    }

    #[tokio::test]
    async fn static_resource_wildcard() {
        let auth = StaticAuthorizer::new().grant("alice", "payment:*");
        assert!(auth
            .check(&ctx("alice"), &Permission::new("payment", Action::Delete))
            .await
            .unwrap());
        assert!(!auth
            .check(&ctx("alice"), &Permission::new("client", Action::Read))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn static_global_wildcard() {
        let auth = StaticAuthorizer::new().grant("root", "*");
        assert!(auth
            .check(&ctx("root"), &Permission::new("workflow", Action::Update))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn static_denies_anonymous_and_unknown_users() {
        let auth = StaticAuthorizer::new().grant("alice", "*");
        let p = Permission::new("payment", Action::Read);
        assert!(!auth.check(&RequestContext::default(), &p).await.unwrap());
        assert!(!auth.check(&ctx("bob"), &p).await.unwrap());
    }

    #[tokio::test]
    async fn parse_grants() {
        let auth = StaticAuthorizer::parse(" alice = payment:read, client:* ; root=* ;").unwrap();
        assert!(auth
            .check(&ctx("alice"), &Permission::new("client", Action::Delete))
            .await
            .unwrap());
        assert!(auth
            .check(&ctx("root"), &Permission::new("product", Action::List))
            .await
            .unwrap());
        assert!(!auth
            .check(&ctx("alice"), &Permission::new("payment", Action::Delete))
            .await
            .unwrap());
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert_matches!(StaticAuthorizer::parse("alice"), Err(CoreError::Internal(_)));
        assert_matches!(StaticAuthorizer::parse("=payment:read"), Err(CoreError::Internal(_)));
    }
}
