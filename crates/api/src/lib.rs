//! # Dev-Share API
//!
//! HTTP transport over the Dev-Share services.
//!
//! - [`config`]: layered process configuration
//! - [`error`]: the error translator every handler returns through
//! - [`build_router`]: routes for one storage backend
//!
//! ```rust,ignore
//! let config = AppConfig::load()?;
//! let backend = SqliteBackend::open(&config.database).await?;
//! let app = build_router(AppState::new(backend, config));
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
mod routes;
mod state;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
