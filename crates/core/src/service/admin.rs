use devshare_error::{Error, ErrorCode, Result};
use tracing::instrument;

use crate::contracts::{self, AdminInit, AdminInitResponse, CreateLocalUser};
use crate::domain::Workspace;
use crate::repository::{UserRepository, WorkspaceRepository};
use crate::service::UserService;
use crate::uow::{self, UnitOfWork};

/// First-run system bootstrap
#[derive(Debug, Clone)]
pub struct AdminService<W, U> {
    workspaces: W,
    users: UserService<U>,
    user_repo: U,
}

impl<W, U> AdminService<W, U>
where
    U: UserRepository,
    W: WorkspaceRepository<Uow = U::Uow>,
{
    pub const fn new(workspaces: W, users: UserService<U>, user_repo: U) -> Self {
        Self {
            workspaces,
            users,
            user_repo,
        }
    }

    /// Create the first workspace and its administrator in one transaction.
    ///
    /// The workspace is written without an admin, the user is created
    /// through [`UserService`] on the same unit of work, then the workspace
    /// is linked to the new user. Any failure leaves nothing behind.
    #[instrument(skip_all, fields(workspace = %request.workspace_name))]
    pub async fn initialize_system(
        &self,
        uow: &mut U::Uow,
        request: AdminInit,
    ) -> Result<AdminInitResponse> {
        contracts::validate(&request)?;

        if self.is_initialized(uow).await? {
            return Err(Error::coded(ErrorCode::Conflict, "System already initialized"));
        }

        uow.begin().await?;
        let outcome = self.provision(uow, request).await;
        uow::finish(uow, outcome).await
    }

    async fn provision(&self, uow: &mut U::Uow, request: AdminInit) -> Result<AdminInitResponse> {
        let workspace = Workspace::new(request.workspace_name, request.workspace_description, None);
        self.workspaces.create(uow, &workspace).await?;

        let admin = self
            .users
            .create_local_user(
                uow,
                CreateLocalUser {
                    name: request.admin_name,
                    email: request.admin_email,
                    password: request.admin_password,
                    workspace_id: workspace.id.to_string(),
                },
            )
            .await?;

        self.workspaces
            .update_admin_id(uow, workspace.id, admin.id())
            .await?;

        tracing::info!(workspace_id = %workspace.id, admin_id = %admin.id(), "system initialized");
        Ok(AdminInitResponse {
            message: "System initialized successfully".to_string(),
            workspace_id: workspace.id,
            admin_user_id: admin.id(),
        })
    }

    pub async fn is_initialized(&self, uow: &mut U::Uow) -> Result<bool> {
        Ok(self.user_repo.count(uow).await? > 0)
    }
}
