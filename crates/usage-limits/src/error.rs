//! Error types for usage-limited values
//!
//! Validation failures are raised before any state changes; member failures
//! pass through untouched.

use thiserror::Error;

/// Result type alias using UsageError
pub type Result<T> = std::result::Result<T, UsageError>;

/// Unified error type for limiter and group operations
#[derive(Debug, Error)]
pub enum UsageError {
    // Rejected input at construction or insertion time
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Configuration source could not be read
    #[error("Configuration error: {0}")]
    Config(String),

    // Raised by a wrapped action or a group member
    #[error(transparent)]
    Member(#[from] anyhow::Error),
}

impl UsageError {
    /// Shorthand for an [`UsageError::InvalidArgument`]
    pub fn invalid(reason: impl Into<String>) -> Self {
        UsageError::InvalidArgument(reason.into())
    }

    /// Whether this error came from a member rather than from validation
    pub fn is_member_error(&self) -> bool {
        matches!(self, UsageError::Member(_))
    }
}

impl From<dotenvy::Error> for UsageError {
    fn from(err: dotenvy::Error) -> Self {
        UsageError::Config(err.to_string())
    }
}
