use serde::Serialize;
use serde_json::Value;

use super::filter::FilterSet;
use super::pagination::paginate;
use super::request::{ListPageData, ListPageRequest, SearchHit, SearchSummary};
use super::search::{SearchMatch, SearchPlan};
use super::sort::SortPlan;
use super::value::{as_text, lookup, SortKey};
use super::ListError;
use crate::entity::Entity;

const ID_FIELD: &str = "id";

/// Runs the list-data pipeline for one kind of record.
#[derive(Debug, Clone)]
pub struct ListDataProcessor {
    search_fields: Vec<String>,
}

struct Row<T> {
    item: T,
    projected: Value,
    search: Option<SearchMatch>,
}

impl ListDataProcessor {
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// A processor using the entity's declared search fields.
    pub fn for_entity<E: Entity>() -> Self {
        Self::new(E::SEARCH_FIELDS.iter().copied())
    }

    /// Filter, search, sort and paginate `items`.
    ///
    /// The request is validated before any item is touched, so a malformed
    /// filter fails even against an empty collection.
    pub fn process<T: Serialize>(
        &self,
        items: Vec<T>,
        request: &ListPageRequest,
    ) -> Result<ListPageData<T>, ListError> {
        let filters = request
            .filters
            .as_ref()
            .map(FilterSet::compile)
            .transpose()?;
        let sort = match &request.sort {
            Some(sort) => SortPlan::compile(sort)?,
            None => None,
        };
        let search = request
            .search
            .as_ref()
            .and_then(|s| SearchPlan::new(s, &self.search_fields));

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let projected =
                serde_json::to_value(&item).map_err(|e| ListError::Projection(e.to_string()))?;
            if filters.as_ref().is_some_and(|f| !f.matches(&projected)) {
                continue;
            }
            let search_match = match &search {
                Some(plan) => match plan.evaluate(&projected) {
                    Some(m) => Some(m),
                    None => continue,
                },
                None => None,
            };
            rows.push(Row {
                item,
                projected,
                search: search_match,
            });
        }

        if let Some(plan) = &sort {
            let mut keyed: Vec<(Vec<SortKey>, Row<T>)> = rows
                .into_iter()
                .map(|row| (plan.keys_for(&row.projected), row))
                .collect();
            keyed.sort_by(|a, b| plan.compare(&a.0, &b.0));
            rows = keyed.into_iter().map(|(_, row)| row).collect();
        } else if search.is_some() {
            rows.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));
        }

        let ids: Vec<String> = rows
            .iter()
            .map(|row| {
                lookup(&row.projected, ID_FIELD)
                    .and_then(as_text)
                    .unwrap_or_default()
            })
            .collect();
        let window = paginate(&ids, request.pagination.as_ref())?;
        let total_matches = rows.len();

        let page: Vec<(String, Row<T>)> = ids
            .into_iter()
            .zip(rows)
            .skip(window.range.start)
            .take(window.range.len())
            .collect();

        let summary = search.as_ref().map(|plan| SearchSummary {
            query: plan.query().to_string(),
            total_matches,
            hits: page
                .iter()
                .filter_map(|(id, row)| {
                    row.search.as_ref().map(|m| SearchHit {
                        id: id.clone(),
                        score: m.score,
                        highlights: m.highlights.clone(),
                    })
                })
                .collect(),
        });

        Ok(ListPageData {
            items: page.into_iter().map(|(_, row)| row.item).collect(),
            pagination: window.response,
            search: summary,
        })
    }
}

fn score_of<T>(row: &Row<T>) -> f64 {
    row.search.as_ref().map_or(0.0, |m| m.score)
}
