//! Row shapes shared by both backends

use chrono::{DateTime, Utc};
use devshare_core::{Credentials, UserAggregate, Workspace};
use devshare_core::domain::BaseUser;
use devshare_error::{Error, ErrorCode, Result, Severity};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct WorkspaceRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkspaceRecord> for Workspace {
    fn from(r: WorkspaceRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            admin_id: r.admin_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub workspace_id: Uuid,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserAggregate> for UserRecord {
    fn from(user: &UserAggregate) -> Self {
        let (oauth_provider, oauth_id, password) = match &user.credentials {
            Credentials::Local { password_hash } => (None, None, Some(password_hash.clone())),
            Credentials::ThirdParty { provider, oauth_id } => {
                (Some(provider.as_str().to_string()), Some(oauth_id.clone()), None)
            }
        };
        Self {
            id: user.base.id,
            name: user.base.name.clone(),
            email: user.base.email.clone(),
            workspace_id: user.base.workspace_id,
            oauth_provider,
            oauth_id,
            password,
            created_at: user.base.created_at,
            updated_at: user.base.updated_at,
        }
    }
}

impl TryFrom<UserRecord> for UserAggregate {
    type Error = Error;

    fn try_from(r: UserRecord) -> Result<Self> {
        let credentials = match (r.oauth_provider, r.oauth_id, r.password) {
            (Some(provider), Some(oauth_id), _) => Credentials::ThirdParty {
                provider: provider.parse().map_err(|e| {
                    Error::wrap(e, "stored user has an unknown oauth provider")
                        .with_code(ErrorCode::Database)
                        .with_severity(Severity::Error)
                        .with_metadata("user_id", r.id.to_string())
                })?,
                oauth_id,
            },
            (None, None, Some(password_hash)) => Credentials::Local { password_hash },
            _ => {
                return Err(Error::coded(ErrorCode::Database, "stored user has no usable credentials")
                    .with_metadata("user_id", r.id.to_string()));
            }
        };

        Ok(Self {
            base: BaseUser {
                id: r.id,
                name: r.name,
                email: r.email,
                workspace_id: r.workspace_id,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            credentials,
        })
    }
}

pub(crate) fn into_users(records: Vec<UserRecord>) -> Result<Vec<UserAggregate>> {
    records.into_iter().map(UserAggregate::try_from).collect()
}
