//! Writer and display configuration

use serde::{Deserialize, Serialize};

/// Where formatted events go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterConfig {
    #[default]
    Stderr,
    Stdout,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Show thread IDs
    pub thread_ids: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Show span list in JSON
    pub span_list: bool,
    /// Flatten JSON event fields into the top-level object
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            source: cfg!(debug_assertions),
            target: true,
            thread_ids: false,
            colors: std::io::IsTerminal::is_terminal(&std::io::stderr()),
            span_list: true,
            flatten: true,
        }
    }
}

impl DisplayConfig {
    pub(super) fn parse_env(&mut self) {
        if let Ok(v) = std::env::var("DEVSHARE_LOG_SOURCE") {
            self.source = v != "0" && v != "false";
        }
        if let Ok(v) = std::env::var("DEVSHARE_LOG_COLORS") {
            self.colors = v != "0" && v != "false";
        }
    }
}
