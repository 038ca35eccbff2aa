use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use devshare_error::{Result, domain};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::{hash_password, verify_password};

/// Supported third-party identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OauthProvider {
    GitHub,
    Google,
}

impl OauthProvider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OauthProvider {
    type Err = devshare_error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "github" => Ok(Self::GitHub),
            "google" => Ok(Self::Google),
            other => Err(domain::invalid_input(
                "oauth_provider",
                format!("unsupported provider {other}"),
            )),
        }
    }
}

/// Fields every user has regardless of how they sign in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub workspace_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BaseUser {
    fn new(name: &str, email: &str, workspace_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            workspace_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// How a user authenticates. Exactly one variant per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credentials {
    Local {
        #[serde(skip_serializing)]
        password_hash: String,
    },
    ThirdParty {
        provider: OauthProvider,
        oauth_id: String,
    },
}

/// A user together with their credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAggregate {
    #[serde(flatten)]
    pub base: BaseUser,
    pub credentials: Credentials,
}

impl UserAggregate {
    pub const fn id(&self) -> Uuid {
        self.base.id
    }

    pub fn email(&self) -> &str {
        &self.base.email
    }

    /// Local users verify against their stored hash. Third-party users have
    /// no password and never match.
    pub fn check_password(&self, password: &str) -> bool {
        match &self.credentials {
            Credentials::Local { password_hash } => verify_password(password, password_hash),
            Credentials::ThirdParty { .. } => false,
        }
    }
}

/// Builds user aggregates from loosely specified sign-up input.
pub struct UserFactory;

impl UserFactory {
    /// Complete OAuth credentials win over a password. A password alone makes
    /// a local user. A provider without an id (or the reverse) is rejected.
    pub fn create(
        provider: Option<OauthProvider>,
        oauth_id: Option<&str>,
        name: &str,
        email: &str,
        password: Option<&str>,
        workspace_id: Uuid,
    ) -> Result<UserAggregate> {
        let credentials = match (provider, oauth_id, password) {
            (Some(provider), Some(oauth_id), _) => Credentials::ThirdParty {
                provider,
                oauth_id: oauth_id.to_string(),
            },
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(domain::invalid_input(
                    "credentials",
                    "oauth provider and oauth id must be given together",
                ));
            }
            (None, None, Some(password)) => {
                return Ok(Self::local(name, email, hash_password(password)?, workspace_id));
            }
            (None, None, None) => {
                return Err(domain::invalid_input(
                    "credentials",
                    "either a password or oauth credentials are required",
                ));
            }
        };

        Ok(UserAggregate {
            base: BaseUser::new(name, email, workspace_id),
            credentials,
        })
    }

    /// A local user around an already computed hash.
    pub fn local(name: &str, email: &str, password_hash: String, workspace_id: Uuid) -> UserAggregate {
        UserAggregate {
            base: BaseUser::new(name, email, workspace_id),
            credentials: Credentials::Local { password_hash },
        }
    }
}
