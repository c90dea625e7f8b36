//! Stop code value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated AMT stop code: exactly four ASCII digits (e.g. `0021`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopCode(String);

impl StopCode {
    /// Number of digits in a stop code
    pub const LENGTH: usize = 4;

    /// Parse a stop code, trimming surrounding whitespace
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let value = input.trim();
        if Self::is_stop_code(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::InvalidStopCode(value.to_string()))
        }
    }

    /// Whether the text has the shape of a stop code
    pub fn is_stop_code(value: &str) -> bool {
        value.len() == Self::LENGTH && value.bytes().all(|b| b.is_ascii_digit())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StopCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for StopCode {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<StopCode> for String {
    fn from(code: StopCode) -> Self {
        code.0
    }
}
