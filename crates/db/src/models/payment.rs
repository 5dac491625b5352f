//! Payments collected against a subscription.

use espyna_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::PaymentStatus;
use super::validate_currency;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Payment {
    #[serde(default)]
    pub id: EntityId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub subscription_id: EntityId,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
    #[serde(default)]
    pub status: PaymentStatus,
    /// Free-form payment method, e.g. `card` or `bank_transfer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub date_created: Option<Timestamp>,
    #[serde(default)]
    pub date_modified: Option<Timestamp>,
}

impl_entity!(Payment {
    kind: "payment",
    domain: "payment",
    resource: "payment",
    search: ["name", "status", "method"],
});
