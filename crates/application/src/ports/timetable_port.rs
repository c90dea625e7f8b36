//! Timetable service port
//!
//! Defines how the application asks the vendor for live stop passages and
//! daily line schedules. The infrastructure layer implements it on top of the
//! AMT scraper.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{LineNumber, LineTimetable, StopCode, StopTimetable};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for timetable lookups
///
/// Implementations report unreachable upstreams as
/// [`ApplicationError::Retrieval`] and unexpected markup as
/// [`ApplicationError::Parse`]. An empty timetable is a success.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TimetablePort: Send + Sync {
    /// Upcoming passages at a stop
    async fn fetch_stop(&self, code: &StopCode) -> Result<StopTimetable, ApplicationError>;

    /// Schedule of a line for the given service day
    async fn fetch_line(
        &self,
        line: &LineNumber,
        date: NaiveDate,
    ) -> Result<LineTimetable, ApplicationError>;
}
