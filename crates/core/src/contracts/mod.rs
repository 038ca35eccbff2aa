//! Request contracts
//!
//! Transport-agnostic request shapes. Every service entry point validates
//! its contract first, so a malformed request never reaches storage.

mod admin;
mod user;
mod validate;
mod workspace;

pub use admin::{AdminInit, AdminInitResponse};
pub use user::CreateLocalUser;
pub use validate::{parse_id, validate};
pub use workspace::{CreateWorkspace, ListWorkspaces, UpdateWorkspace};
