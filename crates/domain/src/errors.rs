//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Stop code is not exactly four ASCII digits
    #[error("Invalid stop code: {0}")]
    InvalidStopCode(String),

    /// Line number token is malformed
    #[error("Invalid line number: {0}")]
    InvalidLineNumber(String),

    /// Coordinate is not a number or out of range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Requested stop count is outside the accepted bounds
    #[error("Invalid stop count: {value} (expected 1 to {max})")]
    InvalidStopCount {
        /// The rejected input as received
        value: String,
        /// Upper bound that was in force
        max: u32,
    },
}
