//! Field lookup and typed views over projected JSON values.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::types::Timestamp;

/// Resolve a field name or dotted path. Null and missing both yield `None`.
pub(crate) fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(item, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|v| !v.is_null())
}

/// Text form used by string filters and search. Arrays join their elements.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(as_text).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Value::Object(_) | Value::Null => None,
    }
}

/// Numbers, and strings that parse as numbers.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_timestamp(value: &Value) -> Option<Timestamp> {
    value.as_str().and_then(parse_timestamp)
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_date(s)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Loose equality used by list filters: numbers numerically, strings
/// case-insensitively, anything else through its text form.
pub(crate) fn loose_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(_), _) | (_, Value::Number(_)) => {
            match (as_number(actual), as_number(expected)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => match (as_text(actual), as_text(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// A comparable view of one field value.
///
/// Mixed types order bool < number < date < text; `Null` is handled by the
/// caller so that it always sorts last.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Bool(bool),
    Number(f64),
    Date(Timestamp),
    Text { folded: String, raw: String },
    Null,
}

impl SortKey {
    pub(crate) fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Null,
            Some(Value::Bool(b)) => SortKey::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Null, SortKey::Number),
            Some(Value::String(s)) => {
                if let Some(n) = s.trim().parse::<f64>().ok().filter(|n| n.is_finite()) {
                    SortKey::Number(n)
                } else if let Some(ts) = parse_timestamp(s) {
                    SortKey::Date(ts)
                } else {
                    SortKey::text(s.clone())
                }
            }
            Some(other) => SortKey::text(other.to_string()),
        }
    }

    fn text(raw: String) -> Self {
        SortKey::Text {
            folded: raw.to_lowercase(),
            raw,
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        matches!(self, SortKey::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Date(_) => 2,
            SortKey::Text { .. } => 3,
            SortKey::Null => 4,
        }
    }

    /// Ascending order between two keys.
    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (
                SortKey::Text { folded: fa, raw: ra },
                SortKey::Text { folded: fb, raw: rb },
            ) => fa.cmp(fb).then_with(|| ra.cmp(rb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}
