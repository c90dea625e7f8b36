//! Timetable adapter - Implements TimetablePort using integration_amt

use std::sync::Arc;

use application::{ApplicationError, TimetablePort};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{LineNumber, LineTimetable, StopCode, StopTimetable};
use integration_amt::{AmtClient, AmtConfig, AmtError, HttpAmtClient};
use tracing::{debug, instrument, warn};

use crate::retry::{RetryConfig, with_retry};

/// Adapter serving timetables scraped from the AMT website
pub struct AmtTimetableAdapter {
    client: Arc<dyn AmtClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for AmtTimetableAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmtTimetableAdapter")
            .field("client", &"dyn AmtClient")
            .field("retry", &self.retry)
            .finish()
    }
}

impl AmtTimetableAdapter {
    /// Create an adapter over the HTTP scraper
    ///
    /// # Errors
    ///
    /// Returns an error if the AMT configuration is invalid.
    pub fn new(config: &AmtConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = HttpAmtClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client), retry))
    }

    /// Create an adapter over any AMT client
    #[must_use]
    pub fn with_client(client: Arc<dyn AmtClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Map integration error to application error
    fn map_error(err: AmtError) -> ApplicationError {
        match err {
            AmtError::Parse(detail) => {
                warn!(%detail, "AMT page did not have the expected structure");
                ApplicationError::Parse(detail)
            },
            AmtError::Configuration(detail) => ApplicationError::Configuration(detail),
            retrieval => ApplicationError::Retrieval(retrieval.to_string()),
        }
    }
}

#[async_trait]
impl TimetablePort for AmtTimetableAdapter {
    #[instrument(skip(self), fields(stop = %code))]
    async fn fetch_stop(&self, code: &StopCode) -> Result<StopTimetable, ApplicationError> {
        let outcome = with_retry(&self.retry, || self.client.departures(code)).await;
        let timetable = outcome.result.map_err(Self::map_error)?;

        debug!(
            departures = timetable.departures.len(),
            attempts = outcome.attempts,
            "Fetched stop timetable"
        );
        Ok(timetable)
    }

    #[instrument(skip(self), fields(line = %line, date = %date))]
    async fn fetch_line(
        &self,
        line: &LineNumber,
        date: NaiveDate,
    ) -> Result<LineTimetable, ApplicationError> {
        let outcome = with_retry(&self.retry, || self.client.line_schedule(line, date)).await;
        let timetable = outcome.result.map_err(Self::map_error)?;

        debug!(
            directions = timetable.directions.len(),
            attempts = outcome.attempts,
            "Fetched line timetable"
        );
        Ok(timetable)
    }
}
