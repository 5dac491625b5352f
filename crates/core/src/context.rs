use serde::{Deserialize, Serialize};

/// Tenant used when a caller does not name one.
pub const DEFAULT_TENANT: &str = "default";

/// Request-scoped caller information threaded through every use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub tenant_id: String,
    /// `None` for anonymous callers.
    pub user_id: Option<String>,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: None,
            request_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT)
    }
}
