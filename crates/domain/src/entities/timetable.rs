//! Timetable records extracted from the vendor pages
//!
//! Field values are kept exactly as the vendor prints them (trimmed). Times
//! such as `08:00` or `3 min` are opaque strings; nothing here parses them.

use serde::{Deserialize, Serialize};

use crate::value_objects::{LineNumber, StopCode};

/// One upcoming bus passage at a stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// Line number as printed by the vendor
    pub line: String,
    /// Terminus the bus is heading to
    pub destination: String,
    /// Scheduled passage time
    pub scheduled_time: String,
    /// Estimated time remaining until arrival
    pub estimated_arrival: String,
}

/// Upcoming passages at a stop, in the order the vendor lists them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTimetable {
    /// The stop that was queried
    pub code: StopCode,
    /// Stop name as shown on the vendor page
    pub stop_name: String,
    /// Passages in document order; empty means no transit right now
    pub departures: Vec<Departure>,
}

impl StopTimetable {
    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }
}

/// Daily departures of a line from one terminus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDirection {
    /// Direction heading as printed on the page
    pub label: String,
    /// Departure times in document order
    pub times: Vec<String>,
}

/// The day's timetable of a line, one block per direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTimetable {
    /// The line that was queried
    pub line: LineNumber,
    /// Page heading, when the vendor prints one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Directions in document order; empty means the line does not exist
    pub directions: Vec<LineDirection>,
}

impl LineTimetable {
    /// Whether the vendor returned no schedule at all
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}
