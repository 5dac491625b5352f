//! Typed field filters.
//!
//! Requests are compiled once (bounds parsed, needles folded) and then
//! applied to every projected item. Missing and null fields fail positive
//! predicates and pass negative ones.

use serde_json::Value;

use super::request::{
    DateOperator, FilterCondition, FilterLogic, FilterRequest, ListOperator, NumberOperator,
    StringOperator, TypedFilter,
};
use super::value::{as_number, as_text, as_timestamp, loose_eq, lookup, parse_date, parse_timestamp};
use super::ListError;
use crate::types::Timestamp;

#[derive(Debug)]
pub(crate) struct FilterSet {
    logic: FilterLogic,
    filters: Vec<CompiledFilter>,
}

#[derive(Debug)]
struct CompiledFilter {
    field: String,
    predicate: Predicate,
}

#[derive(Debug)]
enum Predicate {
    Text {
        operator: StringOperator,
        needle: String,
        case_sensitive: bool,
    },
    Number {
        operator: NumberOperator,
        value: f64,
        upper: f64,
    },
    Boolean(bool),
    Date {
        operator: DateOperator,
        lower: Timestamp,
        upper: Timestamp,
    },
    List {
        operator: ListOperator,
        values: Vec<Value>,
    },
    Null(bool),
}

impl FilterSet {
    pub(crate) fn compile(request: &FilterRequest) -> Result<Self, ListError> {
        let filters = request
            .filters
            .iter()
            .map(compile_one)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            logic: request.logic,
            filters,
        })
    }

    pub(crate) fn matches(&self, item: &Value) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        match self.logic {
            FilterLogic::And => self.filters.iter().all(|f| f.matches(item)),
            FilterLogic::Or => self.filters.iter().any(|f| f.matches(item)),
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ListError {
    ListError::InvalidFilter {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn compile_one(filter: &TypedFilter) -> Result<CompiledFilter, ListError> {
    let field = filter.field.trim();
    if field.is_empty() {
        return Err(invalid(field, "field name is required"));
    }

    let predicate = match &filter.condition {
        FilterCondition::Text {
            operator,
            value,
            case_sensitive,
        } => Predicate::Text {
            operator: *operator,
            needle: if *case_sensitive {
                value.clone()
            } else {
                value.to_lowercase()
            },
            case_sensitive: *case_sensitive,
        },
        FilterCondition::Number {
            operator,
            value,
            upper,
        } => {
            let upper = match (operator, upper) {
                (NumberOperator::Between, None) => {
                    return Err(invalid(field, "between requires an upper bound"));
                }
                (NumberOperator::Between, Some(u)) if u < value => {
                    return Err(invalid(field, "upper bound is below lower bound"));
                }
                (_, Some(u)) => *u,
                (_, None) => *value,
            };
            Predicate::Number {
                operator: *operator,
                value: *value,
                upper,
            }
        }
        FilterCondition::Boolean { value } => Predicate::Boolean(*value),
        FilterCondition::Date {
            operator,
            value,
            upper,
        } => {
            let lower = match operator {
                DateOperator::After => parse_upper_bound(value),
                _ => parse_timestamp(value),
            }
            .ok_or_else(|| invalid(field, format!("'{value}' is not a date")))?;
            let upper = match (operator, upper) {
                (DateOperator::Between, None) => {
                    return Err(invalid(field, "between requires an upper bound"));
                }
                (DateOperator::Between, Some(u)) => {
                    let upper = parse_upper_bound(u)
                        .ok_or_else(|| invalid(field, format!("'{u}' is not a date")))?;
                    if upper < lower {
                        return Err(invalid(field, "upper bound is below lower bound"));
                    }
                    upper
                }
                _ => lower,
            };
            Predicate::Date {
                operator: *operator,
                lower,
                upper,
            }
        }
        FilterCondition::List { operator, values } => Predicate::List {
            operator: *operator,
            values: values.clone(),
        },
        FilterCondition::Null { is_null } => Predicate::Null(*is_null),
    };

    Ok(CompiledFilter {
        field: field.to_string(),
        predicate,
    })
}

/// A bare date as an upper bound covers the whole day, so `after` a bare
/// date starts on the following day.
fn parse_upper_bound(s: &str) -> Option<Timestamp> {
    match parse_date(s) {
        Some(day) => day
            .succ_opt()
            .and_then(|next| parse_timestamp(&next.format("%Y-%m-%d").to_string()))
            .map(|next_midnight| next_midnight - chrono::Duration::nanoseconds(1)),
        None => parse_timestamp(s),
    }
}

impl CompiledFilter {
    fn matches(&self, item: &Value) -> bool {
        let value = lookup(item, &self.field);

        match &self.predicate {
            Predicate::Text {
                operator,
                needle,
                case_sensitive,
            } => {
                let Some(text) = value.and_then(as_text) else {
                    return matches!(
                        operator,
                        StringOperator::NotEquals | StringOperator::NotContains
                    );
                };
                let text = if *case_sensitive { text } else { text.to_lowercase() };
                match operator {
                    StringOperator::Equals => text == *needle,
                    StringOperator::NotEquals => text != *needle,
                    StringOperator::Contains => text.contains(needle.as_str()),
                    StringOperator::NotContains => !text.contains(needle.as_str()),
                    StringOperator::StartsWith => text.starts_with(needle.as_str()),
                    StringOperator::EndsWith => text.ends_with(needle.as_str()),
                }
            }
            Predicate::Number {
                operator,
                value: expected,
                upper,
            } => {
                let Some(actual) = value.and_then(as_number) else {
                    return *operator == NumberOperator::NotEquals;
                };
                match operator {
                    NumberOperator::Equals => actual == *expected,
                    NumberOperator::NotEquals => actual != *expected,
                    NumberOperator::GreaterThan => actual > *expected,
                    NumberOperator::GreaterThanOrEqual => actual >= *expected,
                    NumberOperator::LessThan => actual < *expected,
                    NumberOperator::LessThanOrEqual => actual <= *expected,
                    NumberOperator::Between => actual >= *expected && actual <= *upper,
                }
            }
            Predicate::Boolean(expected) => {
                value.and_then(Value::as_bool) == Some(*expected)
            }
            Predicate::Date {
                operator,
                lower,
                upper,
            } => {
                let Some(actual) = value.and_then(as_timestamp) else {
                    return false;
                };
                match operator {
                    DateOperator::Before => actual < *lower,
                    DateOperator::After => actual > *lower,
                    DateOperator::On => actual.date_naive() == lower.date_naive(),
                    DateOperator::Between => actual >= *lower && actual <= *upper,
                }
            }
            Predicate::List { operator, values } => {
                let found = value.is_some_and(|actual| match actual {
                    Value::Array(elements) => elements
                        .iter()
                        .any(|e| values.iter().any(|v| loose_eq(e, v))),
                    other => values.iter().any(|v| loose_eq(other, v)),
                });
                match operator {
                    ListOperator::In => found,
                    ListOperator::NotIn => !found,
                }
            }
            Predicate::Null(is_null) => value.is_none() == *is_null,
        }
    }
}
