//! List page data: filter, search, sort and paginate an in-memory collection.
//!
//! Every entity's "get list page data" operation runs through
//! [`ListDataProcessor`]. Items are projected to JSON once so that fields can
//! be addressed by name (or dotted path) regardless of the concrete type.
//!
//! Pipeline order is fixed: filter → search → sort → paginate.

mod filter;
mod pagination;
mod processor;
mod request;
mod search;
mod sort;
mod value;

pub use pagination::{clamp_limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use processor::ListDataProcessor;
pub use request::{
    DateOperator, FilterCondition, FilterLogic, FilterRequest, ListOperator, ListPageData,
    ListPageRequest, NumberOperator, PaginationRequest, PaginationResponse, SearchHit,
    SearchRequest, SearchSummary, SortDirection, SortField, SortRequest, StringOperator,
    TypedFilter,
};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("invalid filter on '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("invalid sort on '{field}': {reason}")]
    InvalidSort { field: String, reason: String },

    #[error("unknown cursor '{0}'")]
    InvalidCursor(String),

    #[error("item could not be projected: {0}")]
    Projection(String),
}

impl ListError {
    /// Convert into a [`CoreError`] keyed under the entity `kind`.
    pub fn into_core(self, kind: &str) -> CoreError {
        let entity = crate::messages::display_name(kind);
        match self {
            ListError::InvalidFilter { field, reason } => CoreError::validation(
                format!("{kind}.validation.list_invalid_filter"),
                &[("reason", &format!("{field}: {reason}"))],
            ),
            ListError::InvalidSort { field, reason } => CoreError::validation(
                format!("{kind}.validation.list_invalid_sort"),
                &[("reason", &format!("{field}: {reason}"))],
            ),
            ListError::InvalidCursor(cursor) => CoreError::validation(
                format!("{kind}.validation.list_invalid_cursor"),
                &[("cursor", &cursor), ("entity", &entity)],
            ),
            ListError::Projection(msg) => CoreError::Internal(msg),
        }
    }
}
