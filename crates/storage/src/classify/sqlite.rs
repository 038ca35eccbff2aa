//! SQLite classifier, keyed on extended result codes

use devshare_error::{Error, ErrorCode};
use serde_json::Value;
use sqlx::error::DatabaseError;

use super::{Violation, record_not_found, unrecognized};

pub const CONSTRAINT_CHECK: i64 = 275;
pub const CONSTRAINT_FOREIGN_KEY: i64 = 787;
pub const CONSTRAINT_NOT_NULL: i64 = 1299;
pub const CONSTRAINT_PRIMARY_KEY: i64 = 1555;
pub const CONSTRAINT_UNIQUE: i64 = 2067;

/// Classify a failure raised while running `operation` against SQLite.
pub fn classify(err: sqlx::Error, operation: &str) -> Error {
    if matches!(err, sqlx::Error::RowNotFound) {
        return record_not_found(operation);
    }
    match err.as_database_error().map(inspect) {
        Some(violation) => violation.into_error(err, operation),
        None => unrecognized(err, operation),
    }
}

fn inspect(db: &dyn DatabaseError) -> Violation {
    let extended = db.code().and_then(|c| c.parse::<i64>().ok());
    let code = match extended {
        Some(CONSTRAINT_UNIQUE | CONSTRAINT_PRIMARY_KEY) => ErrorCode::Conflict,
        Some(CONSTRAINT_FOREIGN_KEY | CONSTRAINT_NOT_NULL) => ErrorCode::InvalidInput,
        Some(CONSTRAINT_CHECK) => ErrorCode::Validation,
        _ => ErrorCode::Database,
    };

    let mut fields: Vec<(&'static str, Value)> = Vec::new();
    if let Some(extended) = extended {
        fields.push(("sqlite_code", Value::from(extended)));
    }
    if let Some(constraint) = db.constraint() {
        fields.push(("sqlite_constraint", Value::from(constraint)));
    }
    if let Some(table) = db.table() {
        fields.push(("sqlite_table", Value::from(table)));
    }

    Violation {
        code,
        message: format!("sqlite error: {}", db.message()),
        fields,
    }
}
