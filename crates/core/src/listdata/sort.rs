//! Multi-key stable sorting. Nulls sort last in either direction.

use std::cmp::Ordering;

use serde_json::Value;

use super::request::{SortDirection, SortRequest};
use super::value::{lookup, SortKey};
use super::ListError;

#[derive(Debug)]
pub(crate) struct SortPlan {
    keys: Vec<(String, SortDirection)>,
}

impl SortPlan {
    /// `None` when the request has no sort fields.
    pub(crate) fn compile(request: &SortRequest) -> Result<Option<Self>, ListError> {
        let mut keys = Vec::with_capacity(request.fields.len());
        for sort_field in &request.fields {
            let field = sort_field.field.trim();
            if field.is_empty() {
                return Err(ListError::InvalidSort {
                    field: String::new(),
                    reason: "field name is required".into(),
                });
            }
            keys.push((field.to_string(), sort_field.direction));
        }
        Ok((!keys.is_empty()).then_some(Self { keys }))
    }

    /// Precompute the comparable keys for one item.
    pub(crate) fn keys_for(&self, item: &Value) -> Vec<SortKey> {
        self.keys
            .iter()
            .map(|(field, _)| SortKey::of(lookup(item, field)))
            .collect()
    }

    pub(crate) fn compare(&self, a: &[SortKey], b: &[SortKey]) -> Ordering {
        for ((_, direction), (ka, kb)) in self.keys.iter().zip(a.iter().zip(b)) {
            let ordering = match (ka.is_null(), kb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let asc = ka.compare(kb);
                    match direction {
                        SortDirection::Asc => asc,
                        SortDirection::Desc => asc.reverse(),
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
