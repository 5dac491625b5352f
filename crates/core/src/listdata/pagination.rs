//! Page and cursor pagination over an already ordered result set.

use std::ops::Range;

use super::request::{PaginationRequest, PaginationResponse};
use super::ListError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub range: Range<usize>,
    pub response: PaginationResponse,
}

/// Select the window of `ids` (the ordered result ids) to return.
pub(crate) fn paginate(
    ids: &[String],
    request: Option<&PaginationRequest>,
) -> Result<PageWindow, ListError> {
    let default_request = PaginationRequest::default();
    let request = request.unwrap_or(&default_request);

    let limit = clamp_limit(request.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE) as usize;
    let total = ids.len();
    let total_pages = total.div_ceil(limit);

    let (start, current_page) = match request.cursor.as_deref() {
        Some(cursor) => {
            let cursor = cursor.trim();
            if cursor.is_empty() {
                (0, None)
            } else {
                let position = ids
                    .iter()
                    .position(|id| id == cursor)
                    .ok_or_else(|| ListError::InvalidCursor(cursor.to_string()))?;
                (position + 1, None)
            }
        }
        None => {
            let page = request.page.unwrap_or(1).max(1) as usize;
            let start = (page - 1).saturating_mul(limit).min(total);
            (start, Some(page))
        }
    };

    let end = start.saturating_add(limit).min(total);
    let has_next = end < total;
    let has_prev = match current_page {
        Some(page) => page > 1,
        None => start > 0,
    };
    let next_cursor = if has_next {
        ids.get(end - 1).cloned()
    } else {
        None
    };

    Ok(PageWindow {
        range: start..end,
        response: PaginationResponse {
            total_items: total,
            total_pages,
            current_page,
            page_size: limit,
            has_next,
            has_prev,
            next_cursor,
        },
    })
}
