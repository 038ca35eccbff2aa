//! Domain entities

mod password;
mod user;
mod workspace;

pub use password::{hash_password, hash_password_blocking, verify_password};
pub use user::{BaseUser, Credentials, OauthProvider, UserAggregate, UserFactory};
pub use workspace::Workspace;
