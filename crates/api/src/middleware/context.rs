use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use espyna_core::context::{RequestContext, DEFAULT_TENANT};

use crate::error::AppError;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The caller's [`RequestContext`], built from request headers.
///
/// | Header         | Meaning                                   |
/// |----------------|-------------------------------------------|
/// | `x-tenant-id`  | tenant scope, `"default"` when absent     |
/// | `x-user-id`    | caller identity; absent means anonymous   |
/// | `x-request-id` | correlation id, set by the request-id layer |
///
/// ```ignore
/// async fn my_handler(Ctx(ctx): Ctx) -> AppResult<Json<()>> {
///     tracing::info!(tenant_id = %ctx.tenant_id, "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        let tenant = header(headers, TENANT_HEADER)?.unwrap_or_else(|| DEFAULT_TENANT.to_string());
        let mut ctx = RequestContext::new(tenant);
        if let Some(user) = header(headers, USER_HEADER)? {
            ctx = ctx.with_user(user);
        }
        if let Some(request_id) = header(headers, REQUEST_ID_HEADER)? {
            ctx = ctx.with_request_id(request_id);
        }

        Ok(Ctx(ctx))
    }
}

/// A trimmed, non-empty header value. Values that are not visible ASCII are rejected.
fn header(headers: &HeaderMap, name: &str) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::BadRequest(format!("Header '{name}' must be visible ASCII")))?
        .trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
