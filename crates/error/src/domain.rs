//! Domain error constructors
//!
//! The sanctioned way to signal expected business-rule failures. Every
//! constructor yields a `Warning` value with a fixed status and no stack.
//! Messages are part of the wire contract.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::core::{Error, ErrorCode};

/// `"{entity} not found: {id}"`, 404
pub fn not_found(entity: &str, id: impl Display) -> Error {
    let id = id.to_string();
    Error::coded(ErrorCode::NotFound, format!("{entity} not found: {id}"))
        .with_metadata("entity_type", entity)
        .with_metadata("entity_id", id)
}

/// `"{entity} not found with {field}: {value}"`, 404
pub fn not_found_by_field(entity: &str, field: &str, value: impl Display) -> Error {
    let value = value.to_string();
    Error::coded(
        ErrorCode::NotFound,
        format!("{entity} not found with {field}: {value}"),
    )
    .with_metadata("entity_type", entity)
    .with_metadata("field", field)
    .with_metadata("value", value)
}

/// `"{entity} already exists with {field}: {value}"`, 409
pub fn conflict(entity: &str, field: &str, value: impl Display) -> Error {
    let value = value.to_string();
    Error::coded(
        ErrorCode::Conflict,
        format!("{entity} already exists with {field}: {value}"),
    )
    .with_metadata("entity_type", entity)
    .with_metadata("field", field)
    .with_metadata("value", value)
}

/// `"invalid input for {field}: {reason}"`, 400
pub fn invalid_input(field: &str, reason: impl Display) -> Error {
    let reason = reason.to_string();
    Error::coded(
        ErrorCode::InvalidInput,
        format!("invalid input for {field}: {reason}"),
    )
    .with_metadata("field", field)
    .with_metadata("reason", reason)
}

/// Field-level validation failure, 400.
///
/// The offending fields land under the `fields` metadata key as a
/// `{field: message}` object.
pub fn validation_failed<I, K, V>(fields: I) -> Error
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let fields: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect();
    Error::coded(ErrorCode::Validation, "validation failed").with_metadata("fields", fields)
}

/// `"unauthorized: {reason}"`, 401
pub fn unauthorized(reason: impl Display) -> Error {
    let reason = reason.to_string();
    Error::coded(ErrorCode::Unauthorized, format!("unauthorized: {reason}"))
        .with_metadata("reason", reason)
}

/// `"forbidden: insufficient permissions to {action} {resource}"`, 403
pub fn forbidden(resource: &str, action: &str) -> Error {
    Error::coded(
        ErrorCode::Forbidden,
        format!("forbidden: insufficient permissions to {action} {resource}"),
    )
    .with_metadata("resource", resource)
    .with_metadata("action", action)
}

// Sentinels for call sites without entity context.

pub fn err_not_found() -> Error {
    Error::coded(ErrorCode::NotFound, "entity not found")
}

pub fn err_conflict() -> Error {
    Error::coded(ErrorCode::Conflict, "entity already exists")
}

pub fn err_invalid_input() -> Error {
    Error::coded(ErrorCode::InvalidInput, "invalid input")
}
