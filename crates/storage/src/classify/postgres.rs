//! PostgreSQL classifier, keyed on SQLSTATE

use devshare_error::{Error, ErrorCode};
use serde_json::Value;
use sqlx::error::DatabaseError;
use sqlx::postgres::PgDatabaseError;

use super::{Violation, record_not_found, unrecognized};

pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
pub const NOT_NULL_VIOLATION: &str = "23502";
pub const CHECK_VIOLATION: &str = "23514";

/// Classify a failure raised while running `operation` against Postgres.
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
    let sqlstate = db.code().map(|c| c.into_owned());
    let code = match sqlstate.as_deref() {
        Some(UNIQUE_VIOLATION) => ErrorCode::Conflict,
        Some(FOREIGN_KEY_VIOLATION | NOT_NULL_VIOLATION) => ErrorCode::InvalidInput,
        Some(CHECK_VIOLATION) => ErrorCode::Validation,
        _ => ErrorCode::Database,
    };

    let mut fields: Vec<(&'static str, Value)> = Vec::new();
    let mut push = |key: &'static str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            fields.push((key, Value::from(value)));
        }
    };
    push("pg_code", sqlstate.as_deref());
    push("pg_constraint", db.constraint());
    push("pg_table", db.table());
    if let Some(pg) = db.try_downcast_ref::<PgDatabaseError>() {
        push("pg_detail", pg.detail());
        push("pg_hint", pg.hint());
        push("pg_column", pg.column());
    }

    Violation {
        code,
        message: format!("postgres error: {}", db.message()),
        fields,
    }
}
