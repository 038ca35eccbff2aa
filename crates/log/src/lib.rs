//! # Dev-Share Log
//!
//! Structured logging setup shared by every Dev-Share binary.
//!
//! ```rust,no_run
//! let _guard = devshare_log::auto_init().expect("logger");
//! tracing::info!(port = 8080, "server starting");
//! ```

#![forbid(unsafe_code)]

mod builder;
mod config;
mod writer;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Fields, Format, WriterConfig};

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Logger setup failures
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Filter directive could not be parsed
    #[error("invalid filter: {0}")]
    Filter(String),

    /// Global subscriber could not be installed
    #[error("logger initialization failed: {0}")]
    Init(String),
}

/// Pick a configuration from the environment and build type.
///
/// An explicit `DEVSHARE_LOG`/`RUST_LOG` wins; otherwise debug builds get
/// [`Config::development`] and release builds [`Config::production`]. If a
/// subscriber is already installed it is kept.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }

    if std::env::var("DEVSHARE_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with the default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
