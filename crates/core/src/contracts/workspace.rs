use serde::Deserialize;
use validator::Validate;

use super::validate::{is_uuid, sort_field, sort_order};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkspace {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(custom = "is_uuid")]
    pub admin_id: String,
}

/// Partial update. The id comes from the path, the rest from the body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorkspace {
    #[serde(default)]
    #[validate(custom = "is_uuid")]
    pub id: String,
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Paging query for workspace listings. Unset fields take the listing
/// defaults.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListWorkspaces {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    #[validate(custom = "sort_field")]
    pub sort_by: Option<String>,
    #[validate(custom = "sort_order")]
    pub order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::validate;
    use devshare_error::ErrorCode;
    use uuid::Uuid;

    fn create(name: &str, admin_id: &str) -> CreateWorkspace {
        CreateWorkspace {
            name: name.into(),
            description: String::new(),
            admin_id: admin_id.into(),
        }
    }

    #[test]
    fn test_create_accepts_valid() {
        let req = create("backend", &Uuid::new_v4().to_string());
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_create_reports_every_field() {
        let err = validate(&create("ab", "nope")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);

        let fields = &err.metadata()["fields"];
        assert_eq!(fields["name"], "name must be at least 3 characters");
        assert_eq!(fields["admin_id"], "admin_id must be a valid UUID");
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        let req = UpdateWorkspace {
            id: Uuid::new_v4().to_string(),
            ..Default::default()
        };
        assert!(validate(&req).is_ok());

        let req = UpdateWorkspace {
            name: Some("x".into()),
            ..req
        };
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_list_bounds() {
        assert!(validate(&ListWorkspaces::default()).is_ok());

        let err = validate(&ListWorkspaces {
            limit: Some(101),
            order: Some("UP".into()),
            ..Default::default()
        })
        .unwrap_err();
        let fields = &err.metadata()["fields"];
        assert_eq!(fields["limit"], "limit must be at most 100");
        assert_eq!(fields["order"], "order must be one of: ASC DESC");
    }
}
