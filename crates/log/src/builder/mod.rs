//! Logger builder
//!
//! Composes `Registry + EnvFilter + fmt layer` from a [`Config`] and installs
//! it as the global default subscriber.

#[macro_use]
mod format;

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::{LogError, LogResult, writer};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps the root span entered for as long as the logger lives
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the filter directive cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))?;

        let writer = writer::make_writer(self.config.writer);
        let display = &self.config.display;
        let registry = Registry::default().with(filter);

        let installed = match self.config.format {
            Format::Pretty => registry
                .with(create_fmt_layer!(pretty, display, writer))
                .try_init(),
            Format::Compact => registry
                .with(create_fmt_layer!(compact, display, writer))
                .try_init(),
            Format::Json => registry
                .with(create_json_layer!(display, writer))
                .try_init(),
        };
        installed.map_err(|e| LogError::Init(e.to_string()))?;

        let fields = &self.config.fields;
        let root_span = (!fields.is_empty()).then(|| {
            tracing::info_span!(
                "app",
                service = fields.service.as_deref().unwrap_or(""),
                env = fields.env.as_deref().unwrap_or(""),
                version = fields.version.as_deref().unwrap_or(""),
                instance = fields.instance.as_deref().unwrap_or("")
            )
            .entered()
        });

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}

impl LoggerGuard {
    /// Guard for a process that reused an already-installed subscriber
    #[must_use]
    pub fn noop() -> Self {
        Self { _root_span: None }
    }
}
