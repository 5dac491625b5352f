//! Request and response envelopes.
//!
//! Operation payloads travel as `{ "data": ... }` in both directions.

use serde::{Deserialize, Serialize};

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Standard `{ "data": T }` request envelope.
#[derive(Debug, Deserialize)]
pub struct DataRequest<T> {
    pub data: T,
}

/// Payload of `read` and `delete`.
#[derive(Debug, Deserialize)]
pub struct IdPayload {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub success: bool,
}
