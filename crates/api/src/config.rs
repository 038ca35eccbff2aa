//! Process configuration
//!
//! Built once at startup and handed to every component that needs it.
//! Sources, lowest precedence first:
//!
//! 1. compiled-in defaults
//! 2. `devshare.toml`, or the file named by `DEVSHARE_CONFIG`
//! 3. `DEVSHARE_*` environment variables, `__` separating nested keys
//!    (`DEVSHARE_DATABASE__URL`, `DEVSHARE_SERVER__PORT`)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use devshare_storage::{DatabaseConfig, Driver};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "devshare.toml";

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty disables the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Required in `X-Admin-Init-Token` by `POST /admin/init` when set
    pub init_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub log: devshare_log::Config,
}

impl AppConfig {
    /// Load from the default file (or `DEVSHARE_CONFIG`) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("DEVSHARE_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&path)
    }

    /// Load with an explicit config file. A missing file is skipped.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(path))
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            // DEVSHARE_LOG is a filter directive read by devshare-log itself
            .merge(
                Env::prefixed("DEVSHARE_")
                    .ignore(&["config", "log"])
                    .split("__"),
            )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validated()
    }

    /// Check the invariants serde cannot express. SQLite is pinned to a
    /// single connection whatever was configured.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                field: "server.port",
                reason: "must be non-zero",
            });
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database.url",
                reason: "must not be empty",
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "database.max_connections",
                reason: "must be greater than zero",
            });
        }
        if self.database.backend == Driver::Sqlite {
            self.database.max_connections = 1;
        }
        if self.admin.init_token.as_deref().is_some_and(str::is_empty) {
            self.admin.init_token = None;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                field: "server.host",
                reason: "must be an IP address",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default().validated().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, Driver::Sqlite);
        assert_eq!(config.database.max_connections, 1);
        assert!(config.database.run_migrations);
        assert_eq!(config.admin.init_token, None);
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "devshare.toml",
                r#"
                [server]
                port = 9000

                [database]
                backend = "postgres"
                url = "postgres://localhost/devshare"
                max_connections = 4
                "#,
            )?;
            jail.set_env("DEVSHARE_DATABASE__MAX_CONNECTIONS", "16");
            jail.set_env("DEVSHARE_ADMIN__INIT_TOKEN", "s3cret");

            let config = AppConfig::load_from(Path::new("devshare.toml")).unwrap();
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.database.backend, Driver::Postgres);
            assert_eq!(config.database.url, "postgres://localhost/devshare");
            assert_eq!(config.database.max_connections, 16);
            assert_eq!(config.admin.init_token.as_deref(), Some("s3cret"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_skipped() {
        Jail::expect_with(|_| {
            let config = AppConfig::load_from(Path::new("absent.toml")).unwrap();
            assert_eq!(config, AppConfig::default().validated().unwrap());
            Ok(())
        });
    }

    #[test]
    fn test_sqlite_pinned_to_one_connection() {
        let mut config = AppConfig::default();
        config.database.max_connections = 8;
        assert_eq!(config.validated().unwrap().database.max_connections, 1);
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_rejects_empty_url() {
        let mut config = AppConfig::default();
        config.database.url = "  ".to_string();
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Invalid {
                field: "database.url",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_pool() {
        let mut config = AppConfig::default();
        config.database.backend = Driver::Postgres;
        config.database.max_connections = 0;
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_empty_token_disables_check() {
        let mut config = AppConfig::default();
        config.admin.init_token = Some(String::new());
        assert_eq!(config.validated().unwrap().admin.init_token, None);
    }
}
