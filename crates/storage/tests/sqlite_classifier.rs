//! SQLite classification against failures raised by a real database

mod common;

use common::{TestDb, now};
use devshare_error::{ErrorCode, Severity};
use devshare_storage::classify::sqlite::{self, classify};
use pretty_assertions::assert_eq;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn insert_workspace(pool: &SqlitePool, id: Uuid, name: Option<&str>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO workspaces (id, name, description, created_at, updated_at) VALUES (?, ?, '', ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(now())
    .bind(now())
    .execute(pool)
    .await
    .map(|_| ())
}

async fn insert_user(pool: &SqlitePool, email: &str, workspace_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, name, email, workspace_id, password, created_at, updated_at) \
         VALUES (?, 'Ada', ?, ?, 'hash', ?, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(workspace_id)
    .bind(now())
    .bind(now())
    .execute(pool)
    .await
    .map(|_| ())
}

#[tokio::test]
async fn unique_violation_is_conflict() {
    let db = TestDb::new().await;
    let pool = db.backend.pool();
    let ws = Uuid::new_v4();
    insert_workspace(pool, ws, Some("backend")).await.unwrap();
    insert_user(pool, "ada@example.com", ws).await.unwrap();

    let raw = insert_user(pool, "ada@example.com", ws).await.unwrap_err();
    let err = classify(raw, "create_user");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.http_status(), 409);
    assert_eq!(err.severity(), Severity::Warning);
    assert!(err.stack().is_none());
    assert_eq!(err.metadata()["operation"], "create_user");
    assert_eq!(err.metadata()["sqlite_code"], sqlite::CONSTRAINT_UNIQUE);
    assert!(err.message().starts_with("sqlite error: UNIQUE constraint failed"));
}

#[tokio::test]
async fn primary_key_violation_is_conflict() {
    let db = TestDb::new().await;
    let pool = db.backend.pool();
    let ws = Uuid::new_v4();
    insert_workspace(pool, ws, Some("backend")).await.unwrap();

    let err = classify(
        insert_workspace(pool, ws, Some("frontend")).await.unwrap_err(),
        "create_workspace",
    );

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.metadata()["sqlite_code"], sqlite::CONSTRAINT_PRIMARY_KEY);
}

#[tokio::test]
async fn foreign_key_violation_is_invalid_input() {
    let db = TestDb::new().await;

    let raw = insert_user(db.backend.pool(), "ada@example.com", Uuid::new_v4())
        .await
        .unwrap_err();
    let err = classify(raw, "create_user");

    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert_eq!(err.http_status(), 400);
    assert_eq!(err.severity(), Severity::Warning);
    assert_eq!(err.metadata()["sqlite_code"], sqlite::CONSTRAINT_FOREIGN_KEY);
}

#[tokio::test]
async fn not_null_violation_is_invalid_input() {
    let db = TestDb::new().await;

    let raw = insert_workspace(db.backend.pool(), Uuid::new_v4(), None)
        .await
        .unwrap_err();
    let err = classify(raw, "create_workspace");

    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert_eq!(err.metadata()["sqlite_code"], sqlite::CONSTRAINT_NOT_NULL);
}

#[tokio::test]
async fn check_violation_is_validation() {
    let db = TestDb::new().await;

    let raw = insert_workspace(db.backend.pool(), Uuid::new_v4(), Some("ab"))
        .await
        .unwrap_err();
    let err = classify(raw, "create_workspace");

    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.http_status(), 400);
    assert_eq!(err.metadata()["sqlite_code"], sqlite::CONSTRAINT_CHECK);
}

#[tokio::test]
async fn other_database_error_captures_stack() {
    let db = TestDb::new().await;

    let raw = sqlx::query("SELECT * FROM no_such_table")
        .execute(db.backend.pool())
        .await
        .unwrap_err();
    let err = classify(raw, "list_users");

    assert_eq!(err.code(), ErrorCode::Database);
    assert_eq!(err.http_status(), 500);
    assert_eq!(err.severity(), Severity::Error);
    assert!(!err.stack_trace().is_empty());
    assert!(err.cause().is_some());
}

#[tokio::test]
async fn missing_row_is_not_found_for_any_label() {
    let db = TestDb::new().await;

    for label in ["get_user", "anything at all", ""] {
        let raw = sqlx::query("SELECT 1 WHERE 0")
            .fetch_one(db.backend.pool())
            .await
            .err()
            .unwrap();
        let err = classify(raw, label);

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "record not found");
        assert_eq!(err.metadata()["operation"], label);
    }
}
