//! Core error types and structures
//!
//! - [`error`](crate::core::error) - the rich [`Error`](crate::Error) value
//! - [`code`](crate::core::code) - closed code taxonomy and canonical statuses
//! - [`severity`](crate::core::severity) - ordered severity
//! - [`stack`](crate::core::stack) - severity-gated stack capture
//! - [`result`](crate::core::result) - Result alias and extension trait

pub mod code;
pub mod error;
pub mod result;
pub mod severity;
pub mod stack;

pub use code::ErrorCode;
pub use error::{BoxError, Cause, Chain, Error};
pub use result::{Result, ResultExt};
pub use severity::Severity;
pub use stack::{Frame, Stack};
