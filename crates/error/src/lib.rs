//! # Dev-Share Error Handling
//!
//! One rich error value for every layer: storage classifies driver failures
//! into it, services forward or refine it, and the transport boundary logs
//! and serializes it.
//!
//! ```rust
//! use devshare_error::{domain, ErrorCode, Severity};
//!
//! let err = domain::not_found("Workspace", "42");
//! assert_eq!(err.code(), ErrorCode::NotFound);
//! assert_eq!(err.http_status(), 404);
//! assert_eq!(err.severity(), Severity::Warning);
//! assert!(err.stack_trace().is_empty());
//! ```
//!
//! ## Stack capture
//!
//! Values at `Error` or `Critical` severity capture the call stack once, at
//! construction. Wrapping shares the capture instead of taking a new one, so
//! the frames always point at the original failure site.

pub mod core;
pub mod domain;

pub use self::core::{
    BoxError, Cause, Chain, Error, ErrorCode, Frame, Result, ResultExt, Severity, Stack,
};

/// Convenient prelude
pub mod prelude {
    pub use super::domain;
    pub use super::{Error, ErrorCode, Result, ResultExt, Severity};
}
