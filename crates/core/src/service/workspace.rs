use devshare_error::Result;
use tracing::instrument;

use crate::contracts::{self, CreateWorkspace, ListWorkspaces, UpdateWorkspace};
use crate::domain::Workspace;
use crate::repository::{ListOptions, WorkspaceRepository};
use crate::uow::{self, UnitOfWork};

#[derive(Debug, Clone)]
pub struct WorkspaceService<R> {
    repo: R,
}

impl<R: WorkspaceRepository> WorkspaceService<R> {
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    #[instrument(skip_all, fields(name = %request.name))]
    pub async fn create_workspace(
        &self,
        uow: &mut R::Uow,
        request: CreateWorkspace,
    ) -> Result<Workspace> {
        contracts::validate(&request)?;
        let admin_id = contracts::parse_id("admin_id", &request.admin_id)?;

        uow.begin().await?;
        let workspace = Workspace::new(request.name, request.description, Some(admin_id));
        let outcome = self.repo.create(uow, &workspace).await.map(|()| workspace);
        uow::finish(uow, outcome).await
    }

    pub async fn get_workspace(&self, uow: &mut R::Uow, id: &str) -> Result<Workspace> {
        let id = contracts::parse_id("id", id)?;
        self.repo.get_by_id(uow, id).await
    }

    pub async fn get_workspaces_by_admin(
        &self,
        uow: &mut R::Uow,
        admin_id: &str,
    ) -> Result<Vec<Workspace>> {
        let admin_id = contracts::parse_id("admin_id", admin_id)?;
        self.repo.get_by_admin_id(uow, admin_id).await
    }

    #[instrument(skip_all, fields(id = %request.id))]
    pub async fn update_workspace(
        &self,
        uow: &mut R::Uow,
        request: UpdateWorkspace,
    ) -> Result<Workspace> {
        contracts::validate(&request)?;
        let id = contracts::parse_id("id", &request.id)?;

        uow.begin().await?;
        let outcome = self.apply_update(uow, id, request).await;
        uow::finish(uow, outcome).await
    }

    async fn apply_update(
        &self,
        uow: &mut R::Uow,
        id: uuid::Uuid,
        request: UpdateWorkspace,
    ) -> Result<Workspace> {
        let mut workspace = self.repo.get_by_id(uow, id).await?;
        workspace.apply(request.name, request.description);
        self.repo.update(uow, &workspace).await?;
        Ok(workspace)
    }

    #[instrument(skip(self, uow))]
    pub async fn delete_workspace(&self, uow: &mut R::Uow, id: &str) -> Result<()> {
        let id = contracts::parse_id("id", id)?;

        uow.begin().await?;
        let outcome = self.repo.delete(uow, id).await;
        uow::finish(uow, outcome).await
    }

    pub async fn list_workspaces(
        &self,
        uow: &mut R::Uow,
        request: ListWorkspaces,
    ) -> Result<Vec<Workspace>> {
        contracts::validate(&request)?;
        let opts = ListOptions::new(
            request.limit,
            request.offset,
            request.sort_by.as_deref(),
            request.order.as_deref(),
        )?;
        self.repo.list(uow, &opts).await
    }
}
