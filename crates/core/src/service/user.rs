use devshare_error::{Result, domain};
use tracing::instrument;

use crate::contracts::{self, CreateLocalUser};
use crate::domain::{UserAggregate, UserFactory, hash_password_blocking};
use crate::repository::UserRepository;
use crate::uow::{self, UnitOfWork};

#[derive(Debug, Clone)]
pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a password-based user. Joins the caller's transaction when
    /// one is open.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn create_local_user(
        &self,
        uow: &mut R::Uow,
        request: CreateLocalUser,
    ) -> Result<UserAggregate> {
        contracts::validate(&request)?;
        let workspace_id = contracts::parse_id("workspace_id", &request.workspace_id)?;

        match self.repo.get_by_email(uow, &request.email).await {
            Ok(_) => return Err(domain::conflict("User", "email", &request.email)),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let user = UserFactory::local(&request.name, &request.email, password_hash, workspace_id);

        uow.begin().await?;
        let outcome = self.repo.create(uow, &user).await.map(|()| user);
        uow::finish(uow, outcome).await
    }

    pub async fn get_user(&self, uow: &mut R::Uow, id: &str) -> Result<UserAggregate> {
        let id = contracts::parse_id("id", id)?;
        self.repo.get_by_id(uow, id).await
    }

    pub async fn list_workspace_users(
        &self,
        uow: &mut R::Uow,
        workspace_id: &str,
    ) -> Result<Vec<UserAggregate>> {
        let workspace_id = contracts::parse_id("workspace_id", workspace_id)?;
        self.repo.get_by_workspace_id(uow, workspace_id).await
    }
}
