//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Invalid user input (identifier, coordinate, stop count)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The timetable service could not be reached or answered with an error status
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// The timetable page did not have the expected structure
    #[error("Unexpected page structure: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (storage, task join)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retrieval(_))
    }

    /// Whether the user caused the error and can fix it by sending other input
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_retrieval_is_retryable() {
        assert!(ApplicationError::Retrieval("timeout".to_string()).is_retryable());
        assert!(!ApplicationError::Parse("no title".to_string()).is_retryable());
        assert!(!ApplicationError::Internal("db".to_string()).is_retryable());
        assert!(
            !ApplicationError::Domain(DomainError::InvalidStopCode("x".to_string())).is_retryable()
        );
    }

    #[test]
    fn domain_errors_are_user_errors() {
        let err: ApplicationError = DomainError::InvalidLineNumber("abc".to_string()).into();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Invalid line number: abc");
    }

    #[test]
    fn parse_error_display() {
        let err = ApplicationError::Parse("missing title".to_string());
        assert!(err.to_string().contains("missing title"));
    }
}
