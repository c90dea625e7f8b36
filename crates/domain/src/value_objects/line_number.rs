//! Bus line number value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::StopCode;

/// A bus line identifier as printed on AMT vehicles (e.g. `1`, `18`, `N1`, `20/`)
///
/// Accepts 1 to 5 characters made of ASCII letters, digits and `/`, with at
/// least one digit. A four-digit token is a stop code, never a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineNumber(String);

impl LineNumber {
    /// Maximum accepted token length
    pub const MAX_LENGTH: usize = 5;

    /// Parse a line number, trimming whitespace and upper-casing letters
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let value = input.trim().to_ascii_uppercase();

        let well_formed = !value.is_empty()
            && value.len() <= Self::MAX_LENGTH
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '/')
            && value.chars().any(|c| c.is_ascii_digit());

        if !well_formed || StopCode::is_stop_code(&value) {
            return Err(DomainError::InvalidLineNumber(input.trim().to_string()));
        }

        Ok(Self(value))
    }

    /// Get the line number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LineNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LineNumber> for String {
    fn from(line: LineNumber) -> Self {
        line.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_lines_are_accepted() {
        assert_eq!(LineNumber::parse("1").unwrap().as_str(), "1");
        assert_eq!(LineNumber::parse("18").unwrap().as_str(), "18");
        assert_eq!(LineNumber::parse("640").unwrap().as_str(), "640");
    }

    #[test]
    fn lettered_and_slashed_lines_are_accepted() {
        assert_eq!(LineNumber::parse("n1").unwrap().as_str(), "N1");
        assert_eq!(LineNumber::parse("20/").unwrap().as_str(), "20/");
        assert_eq!(LineNumber::parse("12345").unwrap().as_str(), "12345");
    }

    #[test]
    fn stop_codes_are_not_lines() {
        assert!(LineNumber::parse("1234").is_err());
    }

    #[test]
    fn tokens_without_digits_are_rejected() {
        assert!(LineNumber::parse("abc").is_err());
        assert!(LineNumber::parse("/").is_err());
        assert!(LineNumber::parse("").is_err());
    }

    #[test]
    fn long_or_spaced_tokens_are_rejected() {
        assert!(LineNumber::parse("123456").is_err());
        assert!(LineNumber::parse("1 2").is_err());
        assert!(LineNumber::parse("18;").is_err());
    }
}
