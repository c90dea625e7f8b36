//! AMT error types

use thiserror::Error;

/// Errors that can occur while talking to the AMT timetable service
#[derive(Debug, Error)]
pub enum AmtError {
    /// Connection to the timetable service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Request failed with HTTP status {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// The page did not have the expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl AmtError {
    /// Returns true if repeating the request may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::RequestFailed { status } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::Configuration(_) => false,
        }
    }

    /// Returns true if the service could not be reached or refused the request
    #[must_use]
    pub const fn is_retrieval(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(AmtError::ConnectionFailed("refused".to_string()).is_retryable());
        assert!(AmtError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(AmtError::RequestFailed { status: 503 }.is_retryable());
        assert!(AmtError::RequestFailed { status: 429 }.is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!AmtError::RequestFailed { status: 404 }.is_retryable());
        assert!(!AmtError::Parse("missing title".to_string()).is_retryable());
        assert!(!AmtError::Configuration("empty base_url".to_string()).is_retryable());
    }

    #[test]
    fn test_client_errors_are_still_retrieval_failures() {
        assert!(AmtError::RequestFailed { status: 404 }.is_retrieval());
        assert!(!AmtError::Parse("x".to_string()).is_retrieval());
    }

    #[test]
    fn test_error_display() {
        let err = AmtError::RequestFailed { status: 502 };
        assert!(err.to_string().contains("502"));

        let err = AmtError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));
    }
}
