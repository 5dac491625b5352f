//! Request and response shapes for list page data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationRequest>,
    /// Include soft-deleted records.
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Fields to search; empty means the entity's default search fields.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: Vec<TypedFilter>,
    #[serde(default)]
    pub logic: FilterLogic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

/// One predicate on one field, e.g.
/// `{"field": "amount", "type": "number", "operator": "greater_than", "value": 10}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedFilter {
    pub field: String,
    #[serde(flatten)]
    pub condition: FilterCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterCondition {
    #[serde(rename = "string")]
    Text {
        operator: StringOperator,
        value: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    Number {
        operator: NumberOperator,
        value: f64,
        /// Upper bound for `between`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<f64>,
    },
    Boolean {
        value: bool,
    },
    /// Bounds are RFC 3339 timestamps or `YYYY-MM-DD` dates.
    Date {
        operator: DateOperator,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<String>,
    },
    List {
        operator: ListOperator,
        values: Vec<serde_json::Value>,
    },
    Null {
        is_null: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOperator {
    Before,
    After,
    On,
    Between,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOperator {
    In,
    NotIn,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub fields: Vec<SortField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Page mode (`page`, 1-based) unless `cursor` is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationRequest {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub page: Option<i64>,
    /// Id of the last item of the previous page. Empty starts from the top.
    #[serde(default)]
    pub cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPageData<T> {
    pub items: Vec<T>,
    pub pagination: PaginationResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub total_items: usize,
    pub total_pages: usize,
    /// `None` in cursor mode.
    pub current_page: Option<usize>,
    pub page_size: usize,
    pub has_next: bool,
    pub has_prev: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    pub query: String,
    /// Matches across all pages.
    pub total_matches: usize,
    /// One hit per item on the returned page, in page order.
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub highlights: BTreeMap<String, String>,
}
