//! Built-in message templates keyed by dotted error path.
//!
//! Error keys look like `payment.validation.id_required`: the first segment
//! is the entity kind, the rest selects a template. Templates use `{name}`
//! placeholders that are filled from the supplied parameters.

/// Exact-match templates, looked up by the key with its entity prefix removed.
const TEMPLATES: &[(&str, &str)] = &[
    ("validation.id_required", "{entity} ID is required"),
    (
        "validation.id_too_short",
        "{entity} ID must be at least {min} characters",
    ),
    (
        "validation.id_too_long",
        "{entity} ID must be at most {max} characters",
    ),
    (
        "validation.id_invalid",
        "{entity} ID may only contain letters, digits, '-' and '_'",
    ),
    ("validation.list_invalid_filter", "Invalid filter: {reason}"),
    ("validation.list_invalid_sort", "Invalid sort: {reason}"),
    (
        "validation.list_invalid_cursor",
        "Cursor '{cursor}' does not match any {entity} in the result set",
    ),
    ("errors.not_found", "{entity} with ID '{id}' not found"),
    ("errors.already_exists", "{entity} with ID '{id}' already exists"),
    (
        "errors.authorization_failed",
        "Not allowed to {action} {entity} records",
    ),
];

/// Render the message for `key`, substituting `params`.
///
/// Keys without a template render as the key itself so that the caller
/// still gets a stable, greppable string.
pub fn render(key: &str, params: &[(&str, &str)]) -> String {
    let suffix = key.split_once('.').map(|(_, rest)| rest).unwrap_or(key);

    let template = TEMPLATES
        .iter()
        .find(|(k, _)| *k == suffix)
        .map(|(_, t)| (*t).to_string())
        .or_else(|| field_template(suffix));

    match template {
        Some(t) => substitute(&t, params),
        None => key.to_string(),
    }
}

/// Turn an entity kind (`"payment"`, `"line_item"`) into a display name.
pub fn display_name(kind: &str) -> String {
    kind.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Templates for per-field validation keys (`validation.{field}_required`).
fn field_template(suffix: &str) -> Option<String> {
    let rest = suffix.strip_prefix("validation.")?;
    if let Some(field) = rest.strip_suffix("_required") {
        return Some(format!("{{entity}} {} is required", field.replace('_', " ")));
    }
    if let Some(field) = rest.strip_suffix("_invalid") {
        return Some(format!("{{entity}} {} is invalid", field.replace('_', " ")));
    }
    None
}

fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_exact_template() {
        let msg = render("payment.validation.id_required", &[("entity", "Payment")]);
        assert_eq!(msg, "Payment ID is required");
    }

    #[test]
    fn renders_multiple_params() {
        let msg = render(
            "client.errors.not_found",
            &[("entity", "Client"), ("id", "abc")],
        );
        assert_eq!(msg, "Client with ID 'abc' not found");
    }

    #[test]
    fn renders_field_required_template() {
        let msg = render("product.validation.unit_price_required", &[("entity", "Product")]);
        assert_eq!(msg, "Product unit price is required");
    }

    #[test]
    fn renders_field_invalid_template() {
        let msg = render("payment.validation.currency_invalid", &[("entity", "Payment")]);
        assert_eq!(msg, "Payment currency is invalid");
    }

    #[test]
    fn unknown_key_renders_as_key() {
        assert_eq!(render("workflow.something.else", &[]), "workflow.something.else");
    }

    #[test]
    fn missing_param_leaves_placeholder() {
        assert_eq!(
            render("payment.validation.id_too_short", &[("entity", "Payment")]),
            "Payment ID must be at least {min} characters"
        );
    }

    #[test]
    fn display_name_capitalizes_words() {
        assert_eq!(display_name("payment"), "Payment");
        assert_eq!(display_name("line_item"), "Line Item");
    }
}
