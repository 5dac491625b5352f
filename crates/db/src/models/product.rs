//! Sellable products.

use espyna_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_currency;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[serde(default)]
    pub id: EntityId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub date_created: Option<Timestamp>,
    #[serde(default)]
    pub date_modified: Option<Timestamp>,
}

impl_entity!(Product {
    kind: "product",
    domain: "product",
    resource: "product",
    search: ["name", "description"],
});
