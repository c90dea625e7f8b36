//! HTTP client for the AMT timetable pages

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use domain::{LineNumber, LineTimetable, StopCode, StopTimetable};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, instrument};

use crate::config::AmtConfig;
use crate::error::AmtError;
use crate::parser::{parse_line_page, parse_stop_page};

const STOP_PAGE: &str = "amt/servizi/passaggi_i.php";
const LINE_PAGE: &str = "amt/servizi/orari_tel.php";

/// Trait for AMT timetable clients
///
/// Implementors provide raw page retrieval; the structured lookups combine it
/// with the page parser.
#[async_trait]
pub trait AmtClient: Send + Sync {
    /// Raw HTML of the live passages page of a stop
    async fn stop_page(&self, code: &StopCode) -> Result<String, AmtError>;

    /// Raw HTML of the schedule page of a line for a service day
    async fn line_page(&self, line: &LineNumber, date: NaiveDate) -> Result<String, AmtError>;

    /// Upcoming passages at a stop
    async fn departures(&self, code: &StopCode) -> Result<StopTimetable, AmtError> {
        let html = self.stop_page(code).await?;
        let page = parse_stop_page(&html)?;
        Ok(StopTimetable {
            code: code.clone(),
            stop_name: page.stop_name,
            departures: page.departures,
        })
    }

    /// Departures from the terminals of a line on a service day
    async fn line_schedule(
        &self,
        line: &LineNumber,
        date: NaiveDate,
    ) -> Result<LineTimetable, AmtError> {
        let html = self.line_page(line, date).await?;
        let page = parse_line_page(&html)?;
        Ok(LineTimetable {
            line: line.clone(),
            title: page.title,
            directions: page.directions,
        })
    }
}

/// AMT client scraping the public website
#[derive(Debug)]
pub struct HttpAmtClient {
    client: Client,
    config: AmtConfig,
}

impl HttpAmtClient {
    /// Create a new AMT client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &AmtConfig) -> Result<Self, AmtError> {
        config.validate().map_err(AmtError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AmtError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Send a request and decode the body as text
    async fn fetch(&self, request: RequestBuilder) -> Result<String, AmtError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AmtError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                AmtError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmtError::RequestFailed {
                status: status.as_u16(),
            });
        }

        response
            .text_with_charset(&self.config.fallback_charset)
            .await
            .map_err(|e| AmtError::ConnectionFailed(format!("failed to read body: {e}")))
    }
}

#[async_trait]
impl AmtClient for HttpAmtClient {
    #[instrument(skip(self), fields(stop = %code))]
    async fn stop_page(&self, code: &StopCode) -> Result<String, AmtError> {
        let url = self
            .config
            .endpoint(STOP_PAGE)
            .map_err(AmtError::Configuration)?;

        debug!(%url, "Fetching stop page");

        let request = self
            .client
            .get(url)
            .query(&[("CodiceFermata", code.as_str())]);
        let body = self.fetch(request).await?;

        debug!(bytes = body.len(), "Stop page received");
        Ok(body)
    }

    #[instrument(skip(self), fields(line = %line, date = %date))]
    async fn line_page(&self, line: &LineNumber, date: NaiveDate) -> Result<String, AmtError> {
        let url = self
            .config
            .endpoint(LINE_PAGE)
            .map_err(AmtError::Configuration)?;

        let form = [
            ("linea", line.as_str().to_string()),
            ("gg", date.day().to_string()),
            ("mm", date.month().to_string()),
            ("aa", date.year().to_string()),
            ("cmdOrari", "Mostra Orari".to_string()),
        ];

        debug!(%url, "Fetching line page");

        let request = self.client.post(url).form(&form);
        let body = self.fetch(request).await?;

        debug!(bytes = body.len(), "Line page received");
        Ok(body)
    }
}
