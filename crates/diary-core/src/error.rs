//! # AppError
//!
//! Centralized error handling for the diary.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all diary-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Client input rejected before any write (e.g., blank content)
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body over the accepted size
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// The storage backend never came up at startup
    #[error("storage not initialized")]
    NotReady,

    /// Infrastructure failure (e.g., DB down, query failed).
    /// Carries the message that is safe to show the caller.
    #[error("internal service error: {0}")]
    Internal(String),

    /// Rate limit exceeded
    #[error("too many requests: {0}")]
    RateLimitExceeded(String),
}

impl AppError {
    /// The text handed back to API callers. Never includes storage detail.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::NotFound(msg)
            | AppError::Internal(msg)
            | AppError::RateLimitExceeded(msg) => msg,
            AppError::NotReady => "Storage not initialized",
        }
    }
}

/// A specialized Result type for diary logic.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_message_strips_the_prefix() {
        let err = AppError::Validation("Content is required".into());
        assert_eq!(err.to_string(), "validation error: Content is required");
        assert_eq!(err.public_message(), "Content is required");
        assert_eq!(AppError::NotReady.public_message(), "Storage not initialized");
    }
}
