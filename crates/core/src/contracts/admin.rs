use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate::strong_password;

/// First-run bootstrap: one workspace and its administrator
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminInit {
    #[validate(length(min = 2, max = 100))]
    pub admin_name: String,
    #[validate(email)]
    pub admin_email: String,
    #[validate(length(min = 8), custom = "strong_password")]
    pub admin_password: String,
    #[validate(length(min = 3, max = 100))]
    pub workspace_name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub workspace_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminInitResponse {
    pub message: String,
    pub workspace_id: Uuid,
    pub admin_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::validate;

    #[test]
    fn test_weak_password_rejected() {
        let req = AdminInit {
            admin_name: "Ada".into(),
            admin_email: "ada@example.com".into(),
            admin_password: "password".into(),
            workspace_name: "core".into(),
            workspace_description: String::new(),
        };
        let err = validate(&req).unwrap_err();
        let message = err.metadata()["fields"]["admin_password"].as_str().unwrap();
        assert!(message.starts_with("admin_password must contain"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let req = AdminInit {
            admin_name: "Ada".into(),
            admin_email: "not-an-email".into(),
            admin_password: "Password1!".into(),
            workspace_name: "core".into(),
            workspace_description: String::new(),
        };
        let err = validate(&req).unwrap_err();
        assert_eq!(
            err.metadata()["fields"]["admin_email"],
            "admin_email must be a valid email address"
        );
    }
}
