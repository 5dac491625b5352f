//! The contract every persisted record satisfies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::types::Timestamp;

/// A soft-deletable record with an identifier and audit timestamps.
///
/// `KIND` prefixes error keys and permissions (`payment.validation.*`,
/// `payment:create`); `DOMAIN` and `RESOURCE` name its HTTP path segments.
pub trait Entity:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    const KIND: &'static str;
    const DOMAIN: &'static str;
    const RESOURCE: &'static str;

    /// Fields consulted by free-text search when a request names none,
    /// in descending order of relevance.
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn date_created(&self) -> Option<Timestamp>;
    fn set_date_created(&mut self, at: Timestamp);
    fn set_date_modified(&mut self, at: Timestamp);
}
