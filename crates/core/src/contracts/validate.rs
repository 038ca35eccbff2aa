//! Validation glue between `validator` and the error model

use std::borrow::Cow;

use devshare_error::{Error, Result, domain};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Validate a contract, folding every field failure into one
/// `VALIDATION_ERROR` whose `fields` metadata maps field to message.
pub fn validate<T: Validate>(contract: &T) -> Result<()> {
    contract.validate().map_err(|errors| into_error(&errors))
}

/// Parse an identifier taken from a path or a contract field.
pub fn parse_id(field: &'static str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| domain::validation_failed([(field, format!("{field} must be a valid UUID"))]))
}

fn into_error(errors: &ValidationErrors) -> Error {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| errs.first().map(|e| (field.to_string(), describe(field, e))))
        .collect();
    fields.sort();
    domain::validation_failed(fields)
}

fn describe(field: &str, err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return format!("{field} {message}");
    }

    let param = |key: &str| err.params.get(key).map(render);
    match err.code.as_ref() {
        "required" => format!("{field} is required"),
        "email" => format!("{field} must be a valid email address"),
        "length" => {
            let len = err
                .params
                .get("value")
                .and_then(Value::as_str)
                .map(|s| s.chars().count());
            bound_message(field, param("min"), param("max"), len.map(|l| l as f64), " characters")
        }
        "range" => {
            let value = err.params.get("value").and_then(Value::as_f64);
            bound_message(field, param("min"), param("max"), value, "")
        }
        code => format!("{field} failed validation: {code}"),
    }
}

fn bound_message(
    field: &str,
    min: Option<String>,
    max: Option<String>,
    actual: Option<f64>,
    unit: &str,
) -> String {
    let below_min = match (&min, actual) {
        (Some(min), Some(actual)) => min.parse::<f64>().is_ok_and(|m| actual < m),
        (Some(_), None) => max.is_none(),
        _ => false,
    };
    match (min, max) {
        (Some(min), _) if below_min => format!("{field} must be at least {min}{unit}"),
        (_, Some(max)) => format!("{field} must be at most {max}{unit}"),
        (Some(min), None) => format!("{field} must be at least {min}{unit}"),
        (None, None) => format!("{field} is out of range"),
    }
}

/// Range bounds arrive as floats; print whole numbers without the `.0`.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn is_uuid(value: &str) -> std::result::Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| failure("uuid", "must be a valid UUID"))
}

/// At least one upper, lower, digit and one of `@$!%*?&`.
pub(crate) fn strong_password(value: &str) -> std::result::Result<(), ValidationError> {
    let upper = value.chars().any(char::is_uppercase);
    let lower = value.chars().any(char::is_lowercase);
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let special = value.chars().any(|c| "@$!%*?&".contains(c));

    if value.chars().count() >= 8 && upper && lower && digit && special {
        Ok(())
    } else {
        Err(failure(
            "strong_password",
            "must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
        ))
    }
}

pub(crate) fn sort_field(value: &str) -> std::result::Result<(), ValidationError> {
    if matches!(value, "name" | "created_at" | "updated_at") {
        Ok(())
    } else {
        Err(failure("one_of", "must be one of: name created_at updated_at"))
    }
}

pub(crate) fn sort_order(value: &str) -> std::result::Result<(), ValidationError> {
    if matches!(value, "ASC" | "DESC") {
        Ok(())
    } else {
        Err(failure("one_of", "must be one of: ASC DESC"))
    }
}
