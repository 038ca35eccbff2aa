//! Main [`Error`] value and its fluent construction API

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::core::code::ErrorCode;
use crate::core::severity::Severity;
use crate::core::stack::{Frame, Stack};

/// Boxed foreign error used as an opaque cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What an [`Error`] was caused by.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Another rich error value; classification can be walked through it
    Error(Box<Error>),
    /// A foreign failure (driver, I/O, parser) kept for diagnostics only
    Opaque(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => fmt::Display::fmt(e, f),
            Self::Opaque(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// Rich error value shared by storage, services and the transport boundary.
///
/// A value is built at its failure site through the constructors and fluent
/// mutators below, then treated as read-only. All mutators take `self` by
/// value: once an error has been handed out by reference it cannot be
/// escalated or re-stamped.
///
/// Stack capture is gated by severity. Only `Error` and `Critical` values
/// carry a stack; expected conditions never walk the call stack.
#[derive(Debug, Clone)]
pub struct Error {
    message: Cow<'static, str>,
    code: ErrorCode,
    severity: Severity,
    http_status: u16,
    cause: Option<Cause>,
    metadata: BTreeMap<String, Value>,
    timestamp: DateTime<Utc>,
    stack: Option<Stack>,
}

impl Error {
    fn build(code: ErrorCode, severity: Severity, message: Cow<'static, str>) -> Self {
        Self {
            message,
            code,
            severity,
            http_status: code.http_status(),
            cause: None,
            metadata: BTreeMap::new(),
            timestamp: Utc::now(),
            stack: severity.requires_stack().then(Stack::capture),
        }
    }

    /// Unclassified failure: `Unknown`, `Error` severity, status 500, stack
    /// captured here.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::build(ErrorCode::Unknown, Severity::Error, message.into())
    }

    /// Error with an explicit code. Severity and status follow the code's
    /// defaults; see [`ErrorCode::default_severity`].
    #[must_use]
    pub fn coded(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::build(code, code.default_severity(), message.into())
    }

    /// Shorthand for `coded(ErrorCode::Internal, message)`
    #[must_use]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::coded(ErrorCode::Internal, message)
    }

    /// Wrap another error value with a higher-level message.
    ///
    /// Classification (code, severity, status), metadata and the captured
    /// stack are inherited unchanged, so the stack keeps pointing at the
    /// original failure site no matter how many times the value is wrapped.
    #[must_use]
    pub fn wrap(cause: Self, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            code: cause.code,
            severity: cause.severity,
            http_status: cause.http_status,
            metadata: cause.metadata.clone(),
            timestamp: Utc::now(),
            stack: cause.stack.clone(),
            cause: Some(Cause::Error(Box::new(cause))),
        }
    }

    /// Wrap a foreign failure. The result is `Unknown`/`Error`/500 with a
    /// fresh stack captured at this call.
    #[must_use]
    pub fn wrap_source(
        source: impl Into<BoxError>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let mut err = Self::build(ErrorCode::Unknown, Severity::Error, message.into());
        err.cause = Some(Cause::Opaque(Arc::from(source.into())));
        err
    }

    /// Normalize anything that reached a boundary.
    ///
    /// Rich values pass through untouched; anything else becomes a generic
    /// internal failure.
    #[must_use]
    pub fn normalize(err: BoxError) -> Self {
        match err.downcast::<Self>() {
            Ok(rich) => *rich,
            Err(other) => Self::wrap_source(other, "internal server error")
                .with_code(ErrorCode::Internal),
        }
    }

    /// Attach one metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Reclassify. The status follows the new code unless it had been
    /// overridden explicitly.
    #[must_use]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        if self.http_status == self.code.http_status() {
            self.http_status = code.http_status();
        }
        self.code = code;
        self
    }

    /// Override the HTTP status
    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = status;
        self
    }

    /// Change severity.
    ///
    /// Escalating to `Error`/`Critical` captures a stack if none exists yet;
    /// lowering below `Error` releases it.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        if severity.requires_stack() {
            if self.stack.is_none() {
                self.stack = Some(Stack::capture());
            }
        } else {
            self.stack = None;
        }
        self.severity = severity;
        self
    }

    /// Attach a foreign cause without changing classification
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.cause = Some(Cause::Opaque(Arc::from(source.into())));
        self
    }

    // ==================== Accessors ====================

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[inline]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    #[inline]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    #[inline]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Owned copy of the metadata, safe to hand to another component
    pub fn metadata_cloned(&self) -> BTreeMap<String, Value> {
        self.metadata.clone()
    }

    #[inline]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    #[inline]
    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    /// Filtered frames of the captured stack; empty below `Error`
    pub fn stack_trace(&self) -> Vec<Frame> {
        self.stack
            .as_ref()
            .map(|s| s.frames().to_vec())
            .unwrap_or_default()
    }

    // ==================== Classification ====================

    /// Same classification as `target`. Only the code is compared.
    #[inline]
    pub fn is(&self, target: &Self) -> bool {
        self.code == target.code
    }

    /// This value followed by every rich cause beneath it
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Deepest rich error in the chain
    pub fn root_cause(&self) -> &Self {
        self.chain().last().unwrap_or(self)
    }

    /// Whether any error in the chain carries `code`
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.chain().any(|e| e.code == code)
    }

    pub fn is_not_found(&self) -> bool {
        self.has_code(ErrorCode::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        self.has_code(ErrorCode::Conflict)
    }

    /// `InvalidInput` or `Validation` anywhere in the chain
    pub fn is_invalid_input(&self) -> bool {
        self.chain()
            .any(|e| matches!(e.code, ErrorCode::InvalidInput | ErrorCode::Validation))
    }
}

/// Iterator over an error and its rich causes
#[derive(Debug)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match &current.cause {
            Some(Cause::Error(inner)) => Some(&**inner),
            _ => None,
        };
        Some(current)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {cause}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Some(Cause::Error(inner)) => Some(inner.as_ref()),
            Some(Cause::Opaque(inner)) => Some(inner.as_ref()),
            None => None,
        }
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Error", 8)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", self.message())?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("http_status", &self.http_status)?;
        state.serialize_field("metadata", &self.metadata)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("cause", &self.cause.as_ref().map(ToString::to_string))?;
        state.serialize_field("stack", &self.stack_trace())?;
        state.end()
    }
}
