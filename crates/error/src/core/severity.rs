//! Ordered error severity

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a failure is.
///
/// Ordered `Debug < Info < Warning < Error < Critical`. Severity decides both
/// the log level at the transport boundary and whether a stack is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Whether values at this severity carry a captured stack
    #[inline]
    pub const fn requires_stack(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
