//! Closed error code taxonomy

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::severity::Severity;

/// Category of a failure, independent of its [`Severity`].
///
/// Every code maps to exactly one canonical HTTP status. The string form is
/// part of the wire contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Unclassified failure
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// Infrastructure fault inside the service
    #[serde(rename = "INTERNAL")]
    Internal,
    /// Malformed or semantically invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Requested entity does not exist
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// Entity already exists or state conflicts
    #[serde(rename = "CONFLICT")]
    Conflict,
    /// Caller is not authenticated
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// Caller lacks permission
    #[serde(rename = "FORBIDDEN")]
    Forbidden,
    /// Storage backend failure
    #[serde(rename = "DATABASE_ERROR")]
    Database,
    /// Storage constraint violation with no finer classification
    #[serde(rename = "CONSTRAINT_VIOLATION")]
    Constraint,
    /// Field-level validation failure
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Unknown,
        Self::Internal,
        Self::InvalidInput,
        Self::NotFound,
        Self::Conflict,
        Self::Unauthorized,
        Self::Forbidden,
        Self::Database,
        Self::Constraint,
        Self::Validation,
    ];

    /// Stable wire representation
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Internal => "INTERNAL",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Database => "DATABASE_ERROR",
            Self::Constraint => "CONSTRAINT_VIOLATION",
            Self::Validation => "VALIDATION_ERROR",
        }
    }

    /// Canonical HTTP status for this code
    #[inline]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::Validation => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict | Self::Constraint => 409,
            Self::Unknown | Self::Internal | Self::Database => 500,
        }
    }

    /// Severity assigned when an error is built from this code alone.
    ///
    /// Expected business conditions are warnings; everything else is an
    /// error and pays for a stack capture.
    #[inline]
    pub const fn default_severity(self) -> Severity {
        match self {
            Self::NotFound
            | Self::Conflict
            | Self::InvalidInput
            | Self::Validation
            | Self::Unauthorized
            | Self::Forbidden => Severity::Warning,
            Self::Unknown | Self::Internal | Self::Database | Self::Constraint => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
