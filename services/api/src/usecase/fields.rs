//! Field-level checks shared by the request validators.

use crate::error::FieldErrors;

pub const REQUIRED: &str = "this field is required";
pub const BLANK: &str = "this field may not be blank";

/// Trimmed value of a required text field. Records an error and returns `None`
/// when it is missing or blank.
pub fn required_text(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(value) => non_blank(errors, field, value),
    }
}

/// Like [`required_text`], but a missing value is fine unless `required`.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    required: bool,
) -> Option<String> {
    match value {
        None if required => {
            errors.add(field, REQUIRED);
            None
        }
        None => None,
        Some(value) => non_blank(errors, field, value),
    }
}

/// Records an error when `value` is longer than `max` characters.
pub fn max_chars(errors: &mut FieldErrors, field: &str, value: Option<&str>, max: usize) {
    if value.is_some_and(|v| v.chars().count() > max) {
        errors.add(
            field,
            format!("ensure this field has no more than {max} characters"),
        );
    }
}

fn non_blank(errors: &mut FieldErrors, field: &str, value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_owned())
    }
}
