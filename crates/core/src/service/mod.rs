//! Business operations
//!
//! Each mutating operation brackets its storage calls with
//! `begin` / [`finish`](crate::uow::finish) on the caller's unit of work.
//! Called on its own, that is a complete transaction. Called from another
//! service that already began, it joins the outer transaction instead.

mod admin;
mod user;
mod workspace;

pub use admin::AdminService;
pub use user::UserService;
pub use workspace::WorkspaceService;

use devshare_error::Result;

use crate::repository::RepositoryFactory;

/// Wires services to the repositories of one backend.
#[derive(Debug, Clone)]
pub struct ServiceFactory<F> {
    repos: F,
}

impl<F: RepositoryFactory> ServiceFactory<F> {
    pub const fn new(repos: F) -> Self {
        Self { repos }
    }

    /// A new idle unit of work for one inbound operation
    pub fn unit_of_work(&self) -> F::Uow {
        self.repos.unit_of_work()
    }

    /// Database reachability, for health checks
    pub async fn ping(&self) -> Result<()> {
        self.repos.ping().await
    }

    pub fn workspace_service(&self) -> WorkspaceService<F::Workspaces> {
        WorkspaceService::new(self.repos.workspaces())
    }

    pub fn user_service(&self) -> UserService<F::Users> {
        UserService::new(self.repos.users())
    }

    pub fn admin_service(&self) -> AdminService<F::Workspaces, F::Users> {
        AdminService::new(
            self.repos.workspaces(),
            self.user_service(),
            self.repos.users(),
        )
    }
}
