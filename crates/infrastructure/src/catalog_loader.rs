//! Stop catalog file loading
//!
//! The catalog is a JSON array of `{code, name?, latitude, longitude}`
//! objects. Coordinates may be JSON numbers or numeric strings, since the
//! marker export stores them as text.

use std::{fs, path::Path};

use application::{CatalogError, StopCatalog};
use domain::{DomainError, GeoLocation, Stop, StopCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

/// Errors raised while loading the catalog file
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stop at index {index}: {source}")]
    InvalidStop {
        index: usize,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Coordinate as stored in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// One record of the catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: Degrees,
    pub longitude: Degrees,
}

impl CatalogEntry {
    /// Validate the record into a catalog stop
    pub fn to_stop(&self) -> Result<Stop, DomainError> {
        let code = StopCode::parse(&self.code)?;
        let location = GeoLocation::parse(&self.latitude.as_text(), &self.longitude.as_text())?;
        Ok(Stop::new(code, self.name.clone(), location))
    }
}

/// Parse catalog JSON into a validated catalog
pub fn parse_catalog(json: &str) -> Result<StopCatalog, CatalogLoadError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;

    let stops = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .to_stop()
                .map_err(|source| CatalogLoadError::InvalidStop { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StopCatalog::from_stops(stops)?)
}

/// Read and validate the catalog file
#[instrument]
pub fn load_catalog(path: &Path) -> Result<StopCatalog, CatalogLoadError> {
    let json = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let catalog = parse_catalog(&json)?;
    info!(stops = catalog.len(), "Stop catalog loaded");
    Ok(catalog)
}

/// Write catalog records as pretty-printed JSON
pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<(), CatalogLoadError> {
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json + "\n").map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}
