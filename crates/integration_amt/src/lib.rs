//! AMT Genova timetable integration for Fermata
//!
//! Scrapes the vendor's HTML timetable pages: live passages at a stop
//! (`passaggi_i.php`) and the daily schedule of a line (`orari_tel.php`).
//!
//! # Architecture
//!
//! [`AmtClient`] defines page retrieval and combines it with the [`parser`]
//! into structured timetables; [`HttpAmtClient`] implements retrieval over
//! HTTP. The parser is the only place that knows the positional layout of the
//! vendor markup.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_amt::{AmtClient, AmtConfig, HttpAmtClient};
//!
//! let client = HttpAmtClient::new(&AmtConfig::default())?;
//! let timetable = client.departures(&StopCode::parse("0021")?).await?;
//! ```

mod client;
mod config;
mod error;
pub mod parser;

pub use client::{AmtClient, HttpAmtClient};
pub use config::AmtConfig;
pub use error::AmtError;
pub use parser::{ParsedLinePage, ParsedStopPage, parse_line_page, parse_stop_page};
