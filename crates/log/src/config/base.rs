//! Core configuration types

use serde::{Deserialize, Serialize};

use super::{DisplayConfig, Fields, WriterConfig};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directive (e.g. "info", "debug,sqlx=warn")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Output writer
    pub writer: WriterConfig,

    /// Display options
    pub display: DisplayConfig,

    /// Global fields recorded on the root span
    pub fields: Fields,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Single-line
    Compact,
    /// Structured JSON, one object per line
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            writer: WriterConfig::Stderr,
            display: DisplayConfig::default(),
            fields: Fields::default(),
        }
    }
}
