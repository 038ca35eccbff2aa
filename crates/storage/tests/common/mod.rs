#![allow(dead_code)]

use chrono::Utc;
use devshare_core::contracts::CreateLocalUser;
use devshare_core::{RepositoryFactory, ServiceFactory, UnitOfWork, Workspace, WorkspaceRepository};
use devshare_storage::SqliteBackend;
use tempfile::TempDir;
use uuid::Uuid;

/// A migrated SQLite database in a temporary directory
pub struct TestDb {
    pub backend: SqliteBackend,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("devshare.db").display());
        let backend = SqliteBackend::connect(&url).await.unwrap();
        backend.migrate().await.unwrap();
        Self { backend, _dir: dir }
    }

    pub fn services(&self) -> ServiceFactory<SqliteBackend> {
        ServiceFactory::new(self.backend.clone())
    }

    /// Commit a bare workspace with no admin
    pub async fn seed_workspace(&self, name: &str) -> Workspace {
        let workspace = Workspace::new(name, "", None);
        let mut uow = self.backend.unit_of_work();
        uow.begin().await.unwrap();
        self.backend.workspaces().create(&mut uow, &workspace).await.unwrap();
        uow.commit().await.unwrap();
        workspace
    }

    pub async fn workspace_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM workspaces")
            .fetch_one(self.backend.pool())
            .await
            .unwrap()
    }
}

pub fn local_user(email: &str, workspace_id: Uuid) -> CreateLocalUser {
    CreateLocalUser {
        name: "Ada Lovelace".into(),
        email: email.into(),
        password: "Password1!".into(),
        workspace_id: workspace_id.to_string(),
    }
}

pub fn now() -> chrono::DateTime<Utc> {
    Utc::now()
}
