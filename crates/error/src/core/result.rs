//! Result type and extension traits

use std::borrow::Cow;

use crate::core::error::Error;

/// Result type for Dev-Share operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Extension trait for enriching the error side of a [`Result`]
pub trait ResultExt<T> {
    /// Wrap the error with a higher-level message, keeping its classification
    fn context(self, message: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, message: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|e| Error::wrap(e, message))
    }
}
