use serde::Deserialize;
use validator::Validate;

use super::validate::is_uuid;

/// Sign-up with email and password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocalUser {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(custom = "is_uuid")]
    pub workspace_id: String,
}
