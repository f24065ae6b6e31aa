//! Error types for registry and matching operations.
//!
//! # Taxonomy
//! - `Validation`: malformed input, always names the offending field
//! - `NotFound`: the operation targets an unknown driver id
//! - `Duplicate`: a registration reuses a live driver id
//!
//! "No match" is not an error: a query that runs correctly but finds no
//! eligible offer returns [`crate::matching::MatchOutcome::NoMatch`].
//!
//! None of these errors leaves the registry unusable.

use thiserror::Error;

/// Result type for registry and matching operations.
pub type Result<T> = std::result::Result<T, CarpoolError>;

/// Errors returned by the core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarpoolError {
    /// Input failed boundary validation.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// No live offer has this driver id.
    #[error("driver '{0}' not found")]
    NotFound(String),

    /// A live offer already uses this driver id.
    #[error("driver '{0}' is already registered")]
    Duplicate(String),
}

impl CarpoolError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CarpoolError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Narrow a signed count taken from input to a positive `u32`.
    pub(crate) fn positive_count(field: &'static str, value: i64) -> Result<u32> {
        if value <= 0 {
            return Err(Self::validation(field, "must be a positive integer"));
        }
        u32::try_from(value).map_err(|_| Self::validation(field, "exceeds the supported maximum"))
    }

    /// Stable code for API responses and log aggregation.
    pub fn code(&self) -> &'static str {
        match self {
            CarpoolError::Validation { .. } => "validation_error",
            CarpoolError::NotFound(_) => "not_found",
            CarpoolError::Duplicate(_) => "duplicate_driver",
        }
    }

    /// HTTP status code for server integrations.
    pub fn http_status_code(&self) -> u16 {
        match self {
            CarpoolError::Validation { .. } => 400,
            CarpoolError::NotFound(_) => 404,
            CarpoolError::Duplicate(_) => 409,
        }
    }
}
