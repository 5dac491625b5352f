//! In-memory full-text search over projected items.
//!
//! Every query term must match at least one search field. An item's score
//! is the sum over terms of the best `quality × field weight` for that term.

use std::collections::BTreeMap;

use serde_json::Value;

use super::request::SearchRequest;
use super::value::{as_text, lookup};

const EXACT: f64 = 3.0;
const WORD_PREFIX: f64 = 2.0;
const SUBSTRING: f64 = 1.0;

const FIELD_WEIGHTS: [f64; 4] = [1.0, 0.75, 0.5, 0.25];

pub(crate) const MARK_OPEN: &str = "<mark>";
pub(crate) const MARK_CLOSE: &str = "</mark>";

/// Split a query into terms, trimming punctuation from term edges.
fn sanitize_terms(query: &str) -> Option<Vec<&str>> {
    let terms: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() { None } else { Some(terms) }
}

fn field_weight(position: usize) -> f64 {
    FIELD_WEIGHTS
        .get(position)
        .copied()
        .unwrap_or(FIELD_WEIGHTS[FIELD_WEIGHTS.len() - 1])
}

#[derive(Debug)]
pub(crate) struct SearchPlan {
    query: String,
    terms: Vec<String>,
    fields: Vec<String>,
    highlight: bool,
    case_sensitive: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct SearchMatch {
    pub score: f64,
    pub highlights: BTreeMap<String, String>,
}

impl SearchPlan {
    /// `None` when the query has no usable terms or there is nothing to search.
    pub(crate) fn new(request: &SearchRequest, default_fields: &[String]) -> Option<Self> {
        let terms = sanitize_terms(&request.query)?;

        let requested: Vec<String> = request
            .fields
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        let fields = if requested.is_empty() {
            default_fields.to_vec()
        } else {
            requested
        };
        if fields.is_empty() {
            return None;
        }

        let case_sensitive = request.case_sensitive;
        Some(Self {
            query: request.query.trim().to_string(),
            terms: terms
                .into_iter()
                .map(|t| fold(t, case_sensitive))
                .collect(),
            fields,
            highlight: request.highlight,
            case_sensitive,
        })
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    /// Score one item, or `None` if some term matches no field.
    pub(crate) fn evaluate(&self, item: &Value) -> Option<SearchMatch> {
        let texts: Vec<Option<String>> = self
            .fields
            .iter()
            .map(|field| lookup(item, field).and_then(as_text))
            .collect();
        let folded: Vec<Option<String>> = texts
            .iter()
            .map(|t| t.as_deref().map(|t| fold(t, self.case_sensitive)))
            .collect();

        let mut score = 0.0;
        let mut matched_fields = vec![false; self.fields.len()];

        for term in &self.terms {
            let mut best = 0.0_f64;
            for (position, text) in folded.iter().enumerate() {
                let Some(text) = text else { continue };
                let quality = match_quality(text, term);
                if quality > 0.0 {
                    matched_fields[position] = true;
                    best = best.max(quality * field_weight(position));
                }
            }
            if best == 0.0 {
                return None;
            }
            score += best;
        }

        let mut highlights = BTreeMap::new();
        if self.highlight {
            for (position, text) in texts.iter().enumerate() {
                if let (true, Some(text)) = (matched_fields[position], text) {
                    highlights.insert(
                        self.fields[position].clone(),
                        highlight(text, &self.terms, self.case_sensitive),
                    );
                }
            }
        }

        Some(SearchMatch { score, highlights })
    }
}

fn fold(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}

fn match_quality(text: &str, term: &str) -> f64 {
    if text.trim() == term {
        EXACT
    } else if text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| word.starts_with(term))
    {
        WORD_PREFIX
    } else if text.contains(term) {
        SUBSTRING
    } else {
        0.0
    }
}

/// Wrap every occurrence of any term in `<mark>` tags, merging overlaps.
pub(crate) fn highlight(text: &str, terms: &[String], case_sensitive: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let units: Vec<String> = chars
        .iter()
        .map(|c| fold(&c.to_string(), case_sensitive))
        .collect();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for term in terms {
        let needle: Vec<String> = term
            .chars()
            .map(|c| fold(&c.to_string(), case_sensitive))
            .collect();
        if needle.is_empty() || needle.len() > units.len() {
            continue;
        }
        for start in 0..=units.len() - needle.len() {
            if units[start..start + needle.len()] == needle[..] {
                ranges.push((start, start + needle.len()));
            }
        }
    }
    if ranges.is_empty() {
        return text.to_string();
    }

    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut out = String::with_capacity(text.len() + merged.len() * 13);
    let mut cursor = 0;
    for (start, end) in merged {
        out.extend(&chars[cursor..start]);
        out.push_str(MARK_OPEN);
        out.extend(&chars[start..end]);
        out.push_str(MARK_CLOSE);
        cursor = end;
    }
    out.extend(&chars[cursor..]);
    out
}
