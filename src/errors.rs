//! Error types for the StudyBuddy companion core
//!
//! Two families matter to callers: validation failures, which are handled
//! locally and block an action without ever becoming a system failure, and
//! service failures, which are surfaced to the user as retryable notices.

use thiserror::Error;

/// Main error type for the companion core
#[derive(Error, Debug)]
pub enum CompanionError {
    /// Invalid user input (empty topic, blank message)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Plan service failures: network, malformed response, remote refusal
    #[error("Plan service error: {0}")]
    Service(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("Companion error: {0}")]
    Generic(String),
}

/// Result type alias for companion operations
pub type Result<T> = std::result::Result<T, CompanionError>;

/// Convert anyhow errors to CompanionError
impl From<anyhow::Error> for CompanionError {
    fn from(err: anyhow::Error) -> Self {
        CompanionError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompanionError::Service("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
        assert!(err.to_string().contains("Plan service"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = CompanionError::Validation("topic must not be empty".to_string());
        assert!(err.to_string().contains("topic must not be empty"));
    }

}
