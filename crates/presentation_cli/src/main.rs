//! Fermata CLI
//!
//! Operational tool: catalog maintenance and one-off timetable lookups
//! without going through Telegram.

#![allow(clippy::print_stdout)]

mod catalog_tools;

use std::path::{Path, PathBuf};

use anyhow::Context;
use application::{
    ApplicationError, TimetablePort,
    services::renderer::{
        DisplayText, render_error, render_line_timetable, render_nearest, render_stop_timetable,
    },
};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use domain::{GeoLocation, LineNumber, StopCode, StopCount};
use infrastructure::{AmtTimetableAdapter, AppConfig, load_catalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fermata CLI
#[derive(Parser)]
#[command(name = "fermata-cli")]
#[command(author, version, about = "Fermata operational tool", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "FERMATA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the AMT map markers export into a stop catalog
    ImportMarkers {
        /// Markers XML export
        #[arg(short, long)]
        input: PathBuf,

        /// Catalog JSON to write
        #[arg(short, long, default_value = "stops.json")]
        output: PathBuf,
    },

    /// Load and validate a stop catalog
    CheckCatalog {
        /// Catalog JSON (defaults to catalog.path from the configuration)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print upcoming passages at a stop
    Departures {
        /// Four-digit stop code
        code: String,
    },

    /// Print the schedule of a line
    Line {
        /// Line number, e.g. 18 or 1C
        number: String,

        /// Service day (YYYY-MM-DD), defaults to today in the network timezone
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print the stops closest to a position
    Nearest {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: String,

        /// Number of stops to list
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,

        /// Catalog JSON (defaults to catalog.path from the configuration)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Map verbosity level to log filter
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Explicit catalog path, or the configured one
fn catalog_path(explicit: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(&config.catalog.path))
}

/// Log a failed lookup and render the sentinel printed in its place
fn report(error: &ApplicationError) -> DisplayText {
    if error.is_user_error() {
        tracing::debug!(error = %error, "Rejected input");
    } else {
        tracing::warn!(error = %error, "Lookup failed");
    }
    render_error(error)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::ImportMarkers { input, output } => {
            let summary = catalog_tools::import(&input, &output)?;
            println!(
                "Wrote {} stops to {} ({} markers skipped)",
                summary.written,
                output.display(),
                summary.skipped
            );
        },

        Commands::CheckCatalog { catalog } => {
            let config = load_config(cli.config.as_deref())?;
            let path = catalog_path(catalog, &config);
            let (stops, unnamed) = catalog_tools::check(&path)?;
            println!("{}: {stops} stops, {unnamed} without a name", path.display());
        },

        Commands::Departures { code } => {
            let config = load_config(cli.config.as_deref())?;
            let adapter = AmtTimetableAdapter::new(&config.amt, config.retry.clone())?;
            let rendered = match StopCode::parse(&code) {
                Ok(code) => match adapter.fetch_stop(&code).await {
                    Ok(timetable) => render_stop_timetable(&timetable),
                    Err(e) => report(&e),
                },
                Err(e) => report(&ApplicationError::Domain(e)),
            };
            println!("{}", rendered.text);
        },

        Commands::Line { number, date } => {
            let config = load_config(cli.config.as_deref())?;
            let settings = config.bot.settings()?;
            let adapter = AmtTimetableAdapter::new(&config.amt, config.retry.clone())?;
            let day = date.unwrap_or_else(|| {
                Utc::now()
                    .with_timezone(&settings.network_timezone)
                    .date_naive()
            });
            let rendered = match LineNumber::parse(&number) {
                Ok(line) => match adapter.fetch_line(&line, day).await {
                    Ok(timetable) => render_line_timetable(&timetable),
                    Err(e) => report(&e),
                },
                Err(e) => report(&ApplicationError::Domain(e)),
            };
            println!("{}", rendered.text);
        },

        Commands::Nearest {
            lat,
            lon,
            count,
            catalog,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let origin = GeoLocation::parse(&lat, &lon)?;
            let count = StopCount::new(count, config.bot.max_stop_count)?;
            let catalog = load_catalog(&catalog_path(catalog, &config))?;
            println!("{}", render_nearest(&catalog.find_nearest(&origin, count)).text);
        },
    }

    Ok(())
}
