//! Driver error classification
//!
//! Every storage failure a repository sees goes through the classifier for
//! its backend together with an operation label such as `create_user`.
//! Both backends share one contract:
//!
//! | driver failure              | code           | status | severity |
//! |-----------------------------|----------------|--------|----------|
//! | no matching row             | `NotFound`     | 404    | Warning  |
//! | unique violation            | `Conflict`     | 409    | Warning  |
//! | foreign key violation       | `InvalidInput` | 400    | Warning  |
//! | not-null violation          | `InvalidInput` | 400    | Warning  |
//! | check violation             | `Validation`   | 400    | Warning  |
//! | other database error        | `Database`     | 500    | Error    |
//! | anything else               | `Database`     | 500    | Error    |
//!
//! The operation label and whatever vendor fields the driver exposes are
//! attached as metadata. Entity identity is the caller's business: the
//! missing-row branch only knows the operation, so repositories that can
//! name the entity build [`devshare_error::domain::not_found`] themselves.

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use devshare_error::{Error, ErrorCode, Severity};
use serde_json::Value;

/// Classification target shared by the backend modules
pub(crate) struct Violation {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
    pub(crate) fields: Vec<(&'static str, Value)>,
}

impl Violation {
    pub(crate) fn into_error(self, source: sqlx::Error, operation: &str) -> Error {
        self.fields
            .into_iter()
            .fold(
                Error::coded(self.code, self.message).with_metadata("operation", operation),
                |err, (key, value)| err.with_metadata(key, value),
            )
            .with_source(source)
    }
}

/// Missing-row fallback. Carries the operation only.
pub(crate) fn record_not_found(operation: &str) -> Error {
    Error::coded(ErrorCode::NotFound, "record not found").with_metadata("operation", operation)
}

/// A failure with no recognizable database shape
pub(crate) fn unrecognized(err: sqlx::Error, operation: &str) -> Error {
    Error::wrap_source(err, "database operation failed")
        .with_code(ErrorCode::Database)
        .with_metadata("operation", operation)
}

/// Begin, commit or rollback failed.
pub fn classify_transaction_error(err: sqlx::Error, operation: &str) -> Error {
    Error::wrap_source(err, "transaction failed")
        .with_code(ErrorCode::Internal)
        .with_metadata("operation", operation)
}

/// The pool could not hand out (or open) a connection.
pub fn classify_connection_error(err: sqlx::Error) -> Error {
    Error::wrap_source(err, "database connection failed")
        .with_code(ErrorCode::Database)
        .with_http_status(503)
        .with_severity(Severity::Critical)
}
