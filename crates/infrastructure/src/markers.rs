//! Vendor map markers import
//!
//! The AMT stop map exports its pins as
//! `<markers><marker label="0021 VIA ROMA" lat="44.40" lng="8.93"/>...</markers>`.
//! The label starts with the stop code and continues with the stop name.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::catalog_loader::{CatalogEntry, Degrees};

/// Errors raised while reading the markers export
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("Markers export is not valid XML: {0}")]
    Xml(#[from] quick_xml::DeError),
}

#[derive(Debug, Deserialize)]
struct MarkersDocument {
    #[serde(rename = "marker", default)]
    markers: Vec<RawMarker>,
}

#[derive(Debug, Deserialize)]
struct RawMarker {
    #[serde(rename = "@label", default)]
    label: String,
    #[serde(rename = "@lat")]
    lat: String,
    #[serde(rename = "@lng")]
    lng: String,
}

/// Result of converting a markers export
#[derive(Debug, Default)]
pub struct MarkerImport {
    /// Catalog records in export order
    pub entries: Vec<CatalogEntry>,
    /// Labels that did not start with a stop code
    pub skipped: Vec<String>,
}

/// Split a marker label into code and name
///
/// The code is the leading four digits; the name is the label from its first
/// ASCII letter on. Returns `None` when the label has no leading code.
pub fn split_label(label: &str) -> Option<(String, Option<String>)> {
    let label = label.trim();
    let code = label.get(..4).filter(|c| c.bytes().all(|b| b.is_ascii_digit()))?;
    let name = label
        .find(|c: char| c.is_ascii_alphabetic())
        .map(|start| label[start..].trim().to_string())
        .filter(|name| !name.is_empty());
    Some((code.to_string(), name))
}

/// Convert a markers export into catalog records
pub fn import_markers(xml: &str) -> Result<MarkerImport, MarkerError> {
    let document: MarkersDocument = quick_xml::de::from_str(xml)?;

    let mut import = MarkerImport::default();
    for marker in document.markers {
        match split_label(&marker.label) {
            Some((code, name)) => import.entries.push(CatalogEntry {
                code,
                name,
                latitude: Degrees::Text(marker.lat.trim().to_string()),
                longitude: Degrees::Text(marker.lng.trim().to_string()),
            }),
            None => {
                warn!(label = %marker.label, "Skipping marker without stop code");
                import.skipped.push(marker.label);
            },
        }
    }

    Ok(import)
}
