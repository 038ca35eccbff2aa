//! Persistence capabilities
//!
//! Repositories take the caller's unit of work explicitly, so every call
//! runs inside whatever transaction the caller has open (or on a pooled
//! connection when none is). Every storage failure comes back already
//! classified; repositories never swallow one.

mod list;

use async_trait::async_trait;
use devshare_error::Result;
use uuid::Uuid;

use crate::domain::{OauthProvider, UserAggregate, Workspace};
use crate::uow::UnitOfWork;

pub use list::{ListOptions, SortField, SortOrder};

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    type Uow: UnitOfWork;

    async fn create(&self, uow: &mut Self::Uow, workspace: &Workspace) -> Result<()>;

    /// Soft-deleted workspaces are not found.
    async fn get_by_id(&self, uow: &mut Self::Uow, id: Uuid) -> Result<Workspace>;

    async fn get_by_admin_id(&self, uow: &mut Self::Uow, admin_id: Uuid)
    -> Result<Vec<Workspace>>;

    async fn update(&self, uow: &mut Self::Uow, workspace: &Workspace) -> Result<()>;

    async fn update_admin_id(&self, uow: &mut Self::Uow, id: Uuid, admin_id: Uuid) -> Result<()>;

    /// Marks the workspace deleted; the row stays.
    async fn delete(&self, uow: &mut Self::Uow, id: Uuid) -> Result<()>;

    async fn list(&self, uow: &mut Self::Uow, opts: &ListOptions) -> Result<Vec<Workspace>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    type Uow: UnitOfWork;

    async fn create(&self, uow: &mut Self::Uow, user: &UserAggregate) -> Result<()>;

    async fn get_by_id(&self, uow: &mut Self::Uow, id: Uuid) -> Result<UserAggregate>;

    async fn get_by_email(&self, uow: &mut Self::Uow, email: &str) -> Result<UserAggregate>;

    async fn get_by_oauth_id(
        &self,
        uow: &mut Self::Uow,
        provider: OauthProvider,
        oauth_id: &str,
    ) -> Result<UserAggregate>;

    async fn get_by_workspace_id(
        &self,
        uow: &mut Self::Uow,
        workspace_id: Uuid,
    ) -> Result<Vec<UserAggregate>>;

    /// Overwrite name, email and credentials. A missing user is `NOT_FOUND`.
    async fn update(&self, uow: &mut Self::Uow, user: &UserAggregate) -> Result<()>;

    async fn delete(&self, uow: &mut Self::Uow, id: Uuid) -> Result<()>;

    async fn list(&self, uow: &mut Self::Uow, opts: &ListOptions) -> Result<Vec<UserAggregate>>;

    async fn count(&self, uow: &mut Self::Uow) -> Result<i64>;
}

/// One storage backend: hands out fresh units of work and the repositories
/// that run on them.
#[async_trait]
pub trait RepositoryFactory: Clone + Send + Sync + 'static {
    type Uow: UnitOfWork + 'static;
    type Workspaces: WorkspaceRepository<Uow = Self::Uow> + Clone + 'static;
    type Users: UserRepository<Uow = Self::Uow> + Clone + 'static;

    /// A new idle unit of work. One per inbound operation.
    fn unit_of_work(&self) -> Self::Uow;

    fn workspaces(&self) -> Self::Workspaces;

    fn users(&self) -> Self::Users;

    /// Round-trip to the database
    async fn ping(&self) -> Result<()>;
}
