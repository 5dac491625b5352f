//! Versioned workflow definitions.

use espyna_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::WorkflowStatus;

fn first_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Workflow {
    #[serde(default)]
    pub id: EntityId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default = "first_version")]
    #[validate(range(min = 1))]
    pub version: u32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub date_created: Option<Timestamp>,
    #[serde(default)]
    pub date_modified: Option<Timestamp>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            name: String::new(),
            description: None,
            status: WorkflowStatus::default(),
            version: first_version(),
            active: false,
            date_created: None,
            date_modified: None,
        }
    }
}

impl_entity!(Workflow {
    kind: "workflow",
    domain: "workflow",
    resource: "workflow",
    search: ["name", "description"],
});
