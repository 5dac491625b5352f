//! A client's subscription to a product.

use espyna_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::SubscriptionStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Subscription {
    #[serde(default)]
    pub id: EntityId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub client_id: EntityId,
    #[validate(length(min = 1))]
    pub product_id: EntityId,
    #[serde(default)]
    pub status: SubscriptionStatus,
    pub start_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub date_created: Option<Timestamp>,
    #[serde(default)]
    pub date_modified: Option<Timestamp>,
}

impl_entity!(Subscription {
    kind: "subscription",
    domain: "subscription",
    resource: "subscription",
    search: ["name", "status"],
});
