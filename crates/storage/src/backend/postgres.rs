//! PostgreSQL backend

use async_trait::async_trait;
use chrono::Utc;
use devshare_core::{
    ListOptions, OauthProvider, RepositoryFactory, UserAggregate, UserRepository, Workspace,
    WorkspaceRepository,
};
use devshare_error::{Result, domain};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{DatabaseConfig, Driver, migration_error};
use crate::classify::classify_connection_error;
use crate::classify::postgres::classify;
use crate::record::{UserRecord, WorkspaceRecord, into_users};
use crate::uow::Coordinator;

pub type PostgresUnitOfWork = Coordinator<PgPool>;

#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let config = DatabaseConfig {
            backend: Driver::Postgres,
            url: url.to_string(),
            max_connections,
            ..DatabaseConfig::default()
        };
        Self::connect_with(&config).await
    }

    /// Connect as configured and apply migrations when enabled.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let backend = Self::connect_with(config).await?;
        if config.run_migrations {
            backend.migrate().await?;
        }
        Ok(backend)
    }

    async fn connect_with(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(classify_connection_error)?;

        tracing::info!(max_connections = config.max_connections, "connected to postgres");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(migration_error)?;
        tracing::info!("postgres migrations applied");
        Ok(())
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RepositoryFactory for PostgresBackend {
    type Uow = PostgresUnitOfWork;
    type Workspaces = PostgresWorkspaceRepository;
    type Users = PostgresUserRepository;

    fn unit_of_work(&self) -> Self::Uow {
        Coordinator::new(self.pool.clone())
    }

    fn workspaces(&self) -> Self::Workspaces {
        PostgresWorkspaceRepository
    }

    fn users(&self) -> Self::Users {
        PostgresUserRepository
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(classify_connection_error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresWorkspaceRepository;

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    type Uow = PostgresUnitOfWork;

    async fn create(&self, uow: &mut Self::Uow, workspace: &Workspace) -> Result<()> {
        let mut conn = uow.querier().await?;
        sqlx::query(
            "INSERT INTO workspaces (id, name, description, admin_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(workspace.id)
        .bind(&workspace.name)
        .bind(&workspace.description)
        .bind(workspace.admin_id)
        .bind(workspace.created_at)
        .bind(workspace.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| classify(e, "create_workspace"))?;
        Ok(())
    }

    async fn get_by_id(&self, uow: &mut Self::Uow, id: Uuid) -> Result<Workspace> {
        let mut conn = uow.querier().await?;
        sqlx::query_as::<_, WorkspaceRecord>(
            "SELECT id, name, description, admin_id, created_at, updated_at \
             FROM workspaces WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| classify(e, "get_workspace"))?
        .map(Workspace::from)
        .ok_or_else(|| domain::not_found("Workspace", id))
    }

    async fn get_by_admin_id(&self, uow: &mut Self::Uow, admin_id: Uuid) -> Result<Vec<Workspace>> {
        let mut conn = uow.querier().await?;
        let records = sqlx::query_as::<_, WorkspaceRecord>(
            "SELECT id, name, description, admin_id, created_at, updated_at \
             FROM workspaces WHERE admin_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        )
        .bind(admin_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| classify(e, "get_workspaces_by_admin"))?;
        Ok(records.into_iter().map(Workspace::from).collect())
    }

    async fn update(&self, uow: &mut Self::Uow, workspace: &Workspace) -> Result<()> {
        let mut conn = uow.querier().await?;
        let result = sqlx::query(
            "UPDATE workspaces SET name = $1, description = $2, updated_at = $3 \
             WHERE id = $4 AND deleted_at IS NULL",
        )
        .bind(&workspace.name)
        .bind(&workspace.description)
        .bind(workspace.updated_at)
        .bind(workspace.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| classify(e, "update_workspace"))?;

        if result.rows_affected() == 0 {
            return Err(domain::not_found("Workspace", workspace.id));
        }
        Ok(())
    }

    async fn update_admin_id(&self, uow: &mut Self::Uow, id: Uuid, admin_id: Uuid) -> Result<()> {
        let mut conn = uow.querier().await?;
        let result = sqlx::query(
            "UPDATE workspaces SET admin_id = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL",
        )
        .bind(admin_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| classify(e, "update_workspace_admin"))?;

        if result.rows_affected() == 0 {
            return Err(domain::not_found("Workspace", id));
        }
        Ok(())
    }

    async fn delete(&self, uow: &mut Self::Uow, id: Uuid) -> Result<()> {
        let mut conn = uow.querier().await?;
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE workspaces SET deleted_at = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| classify(e, "delete_workspace"))?;

        if result.rows_affected() == 0 {
            return Err(domain::not_found("Workspace", id));
        }
        Ok(())
    }

    async fn list(&self, uow: &mut Self::Uow, opts: &ListOptions) -> Result<Vec<Workspace>> {
        let sql = format!(
            "SELECT id, name, description, admin_id, created_at, updated_at \
             FROM workspaces WHERE deleted_at IS NULL ORDER BY {} LIMIT $1 OFFSET $2",
            opts.order_clause()
        );
        let mut conn = uow.querier().await?;
        let records = sqlx::query_as::<_, WorkspaceRecord>(&sql)
            .bind(opts.limit)
            .bind(opts.offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| classify(e, "list_workspaces"))?;
        Ok(records.into_iter().map(Workspace::from).collect())
    }
}

const USER_COLUMNS: &str = "id, name, email, workspace_id, oauth_provider, oauth_id, password, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
    async fn fetch_one_by(
        uow: &mut PostgresUnitOfWork,
        filter: &str,
        binds: &[&str],
        operation: &str,
    ) -> Result<Option<UserAggregate>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter}");
        let mut query = sqlx::query_as::<_, UserRecord>(&sql);
        for value in binds {
            query = query.bind(*value);
        }

        let mut conn = uow.querier().await?;
        query
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| classify(e, operation))?
            .map(UserAggregate::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    type Uow = PostgresUnitOfWork;

    async fn create(&self, uow: &mut Self::Uow, user: &UserAggregate) -> Result<()> {
        let record = UserRecord::from(user);
        let mut conn = uow.querier().await?;
        sqlx::query(
            "INSERT INTO users (id, name, email, workspace_id, oauth_provider, oauth_id, password, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(record.workspace_id)
        .bind(&record.oauth_provider)
        .bind(&record.oauth_id)
        .bind(&record.password)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| classify(e, "create_user"))?;
        Ok(())
    }

    async fn get_by_id(&self, uow: &mut Self::Uow, id: Uuid) -> Result<UserAggregate> {
        let mut conn = uow.querier().await?;
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| classify(e, "get_user"))?
        .ok_or_else(|| domain::not_found("User", id))?;
        UserAggregate::try_from(record)
    }

    async fn get_by_email(&self, uow: &mut Self::Uow, email: &str) -> Result<UserAggregate> {
        Self::fetch_one_by(uow, "email = $1", &[email], "get_user_by_email")
            .await?
            .ok_or_else(|| domain::not_found_by_field("User", "email", email))
    }

    async fn get_by_oauth_id(
        &self,
        uow: &mut Self::Uow,
        provider: OauthProvider,
        oauth_id: &str,
    ) -> Result<UserAggregate> {
        Self::fetch_one_by(
            uow,
            "oauth_provider = $1 AND oauth_id = $2",
            &[provider.as_str(), oauth_id],
            "get_user_by_oauth_id",
        )
        .await?
        .ok_or_else(|| domain::not_found_by_field("User", "oauth_id", oauth_id))
    }

    async fn get_by_workspace_id(
        &self,
        uow: &mut Self::Uow,
        workspace_id: Uuid,
    ) -> Result<Vec<UserAggregate>> {
        let mut conn = uow.querier().await?;
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE workspace_id = $1 ORDER BY created_at"
        ))
        .bind(workspace_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| classify(e, "get_users_by_workspace"))?;
        into_users(records)
    }

    async fn update(&self, uow: &mut Self::Uow, user: &UserAggregate) -> Result<()> {
        let record = UserRecord::from(user);
        let mut conn = uow.querier().await?;
        let result = sqlx::query(
            "UPDATE users SET name = $1, email = $2, oauth_provider = $3, oauth_id = $4, password = $5, updated_at = $6 WHERE id = $7",
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.oauth_provider)
        .bind(&record.oauth_id)
        .bind(&record.password)
        .bind(Utc::now())
        .bind(record.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| classify(e, "update_user"))?;

        if result.rows_affected() == 0 {
            return Err(domain::not_found("User", record.id));
        }
        Ok(())
    }

    async fn delete(&self, uow: &mut Self::Uow, id: Uuid) -> Result<()> {
        let mut conn = uow.querier().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| classify(e, "delete_user"))?;

        if result.rows_affected() == 0 {
            return Err(domain::not_found("User", id));
        }
        Ok(())
    }

    async fn list(&self, uow: &mut Self::Uow, opts: &ListOptions) -> Result<Vec<UserAggregate>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {} LIMIT $1 OFFSET $2",
            opts.order_clause()
        );
        let mut conn = uow.querier().await?;
        let records = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(opts.limit)
            .bind(opts.offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| classify(e, "list_users"))?;
        into_users(records)
    }

    async fn count(&self, uow: &mut Self::Uow) -> Result<i64> {
        let mut conn = uow.querier().await?;
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| classify(e, "count_users"))
    }
}
