//! Clients of the business (the `entity` domain).

use espyna_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Client {
    #[serde(default)]
    pub id: EntityId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub date_created: Option<Timestamp>,
    #[serde(default)]
    pub date_modified: Option<Timestamp>,
}

impl_entity!(Client {
    kind: "client",
    domain: "entity",
    resource: "client",
    search: ["name", "email", "phone"],
});
