//! Catalog stop entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, StopCode};

/// A physical bus stop from the static catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Unique stop code
    pub code: StopCode,
    /// Human-readable label, missing in older catalog exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Position of the stop pole
    pub location: GeoLocation,
}

impl Stop {
    /// Create a new stop
    pub fn new(code: StopCode, name: Option<String>, location: GeoLocation) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            code,
            name,
            location,
        }
    }

    /// Name to show to users, falling back to the code
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.code.as_str())
    }
}
