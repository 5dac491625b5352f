//! Identifier and field validation shared by every use case.
//!
//! Each failure is reported as [`CoreError::Validation`] with a dotted key
//! prefixed by the entity kind (`payment.validation.id_too_short`).

use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::error::CoreError;
use crate::messages::display_name;

/// Minimum accepted identifier length (characters).
pub const MIN_ID_LENGTH: usize = 3;

/// Maximum accepted identifier length (characters).
pub const MAX_ID_LENGTH: usize = 100;

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// Validate an entity identifier supplied by a caller.
pub fn validate_id(kind: &str, id: &str) -> Result<(), CoreError> {
    let entity = display_name(kind);
    let trimmed = id.trim();

    if trimmed.is_empty() {
        return Err(CoreError::validation(
            format!("{kind}.validation.id_required"),
            &[("entity", &entity)],
        ));
    }

    let len = id.chars().count();
    if len < MIN_ID_LENGTH {
        return Err(CoreError::validation(
            format!("{kind}.validation.id_too_short"),
            &[("entity", &entity), ("min", &MIN_ID_LENGTH.to_string())],
        ));
    }
    if len > MAX_ID_LENGTH {
        return Err(CoreError::validation(
            format!("{kind}.validation.id_too_long"),
            &[("entity", &entity), ("max", &MAX_ID_LENGTH.to_string())],
        ));
    }

    if !ID_RE.is_match(id) {
        return Err(CoreError::validation(
            format!("{kind}.validation.id_invalid"),
            &[("entity", &entity)],
        ));
    }

    Ok(())
}

/// Run the `validator` rules declared on `value`.
///
/// Only the first failing field (in alphabetical order, for stable output)
/// is reported. Empty string values are reported as `{field}_required`,
/// everything else as `{field}_invalid`.
pub fn validate_fields<T: Validate>(kind: &str, value: &T) -> Result<(), CoreError> {
    let errors = match value.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let Some((field, failures)) = fields.first() else {
        return Err(CoreError::validation(
            format!("{kind}.validation.invalid"),
            &[],
        ));
    };

    let is_blank = failures.iter().any(|f| {
        f.code == "required"
            || f.params
                .get("value")
                .and_then(|v| v.as_str())
                .is_some_and(|s| s.trim().is_empty())
    });
    let suffix = if is_blank { "required" } else { "invalid" };

    Err(CoreError::validation(
        format!("{kind}.validation.{field}_{suffix}"),
        &[("entity", &display_name(kind))],
    ))
}
