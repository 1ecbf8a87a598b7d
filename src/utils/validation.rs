use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

/// Field name → messages, as reported back to the caller.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

pub fn single(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.into()]);
    errors
}

/// Builds a validation failure that echoes the submitted input back unchanged.
pub fn rejected<T: Serialize>(input: &T, errors: FieldErrors) -> AppError {
    AppError::Validation {
        errors,
        input: serde_json::to_value(input).unwrap_or(Value::Null),
    }
}

pub fn validate_form<T: Validate + Serialize>(form: &T) -> Result<(), AppError> {
    form.validate()
        .map_err(|e| rejected(form, field_errors(&e)))
}

/// Unwraps a field already checked by `#[validate(required)]`.
pub fn require<T, F: Serialize>(
    form: &F,
    value: Option<T>,
    field: &str,
    message: &str,
) -> Result<T, AppError> {
    value.ok_or_else(|| rejected(form, single(field, message)))
}
