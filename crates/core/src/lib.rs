//! # Dev-Share Core
//!
//! Backend-neutral pieces of the Dev-Share service:
//!
//! - [`domain`]: workspaces and user aggregates
//! - [`contracts`]: validated request shapes
//! - [`repository`]: persistence capabilities the storage layer implements
//! - [`uow`]: the unit-of-work seam shared by repositories and services
//! - [`service`]: business operations composed over a shared unit of work
//!
//! Nothing here knows which database is in use. Storage crates implement
//! [`repository::RepositoryFactory`] and the services run unchanged on top.

pub mod contracts;
pub mod domain;
pub mod repository;
pub mod service;
pub mod uow;

pub use domain::{Credentials, OauthProvider, UserAggregate, UserFactory, Workspace};
pub use repository::{ListOptions, RepositoryFactory, UserRepository, WorkspaceRepository};
pub use service::{AdminService, ServiceFactory, UserService, WorkspaceService};
pub use uow::UnitOfWork;
