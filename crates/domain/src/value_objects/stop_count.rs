//! Stop count preference value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of nearest stops a user wants to see for a location query
///
/// Always at least 1. The upper bound is a deployment setting, so it is
/// passed in on construction rather than fixed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopCount(u32);

impl StopCount {
    /// Count used when the user never stored a preference
    pub const DEFAULT: Self = Self(1);

    /// Create a stop count within `1..=max`
    pub fn new(value: u32, max: u32) -> Result<Self, DomainError> {
        if value == 0 || value > max {
            return Err(DomainError::InvalidStopCount {
                value: value.to_string(),
                max,
            });
        }
        Ok(Self(value))
    }

    /// Parse user text (e.g. a keyboard button press) into a stop count
    pub fn parse(input: &str, max: u32) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let value: u32 = trimmed.parse().map_err(|_| DomainError::InvalidStopCount {
            value: trimmed.to_string(),
            max,
        })?;
        Self::new(value, max)
    }

    /// Restore a count read back from storage, clamping corrupt values to 1
    pub fn from_stored(value: i64) -> Self {
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .map_or(Self::DEFAULT, Self)
    }

    /// Lower the count to `max` when a stored value exceeds the current limit
    #[must_use]
    pub fn clamped(self, max: u32) -> Self {
        Self(self.0.min(max.max(1)))
    }

    /// Get the count
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Get the count as a `usize` for slicing
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl Default for StopCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for StopCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
