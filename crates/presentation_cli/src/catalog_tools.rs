//! Stop catalog maintenance
//!
//! Converts the vendor map markers export into the catalog file and checks
//! an existing catalog before the bot is pointed at it.

use std::{fs, path::Path};

use anyhow::{Context, bail};
use infrastructure::{import_markers, load_catalog, write_catalog};
use tracing::{info, warn};

/// Summary of a markers import
#[derive(Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Convert a markers XML export into a catalog JSON file
///
/// The written file is loaded back, so a successful import is also a valid
/// catalog.
pub fn import(input: &Path, output: &Path) -> anyhow::Result<ImportSummary> {
    let xml = fs::read_to_string(input)
        .with_context(|| format!("Failed to read markers file {}", input.display()))?;

    let import = import_markers(&xml)?;
    if import.entries.is_empty() {
        bail!("No marker in {} carries a stop code", input.display());
    }
    for label in &import.skipped {
        warn!(%label, "Skipped marker without stop code");
    }

    write_catalog(output, &import.entries)?;
    let catalog = load_catalog(output)
        .with_context(|| format!("Imported catalog {} is not valid", output.display()))?;

    info!(
        stops = catalog.len(),
        skipped = import.skipped.len(),
        output = %output.display(),
        "Markers imported"
    );

    Ok(ImportSummary {
        written: import.entries.len(),
        skipped: import.skipped.len(),
    })
}

/// Load a catalog and report how many stops it holds, and how many are unnamed
pub fn check(path: &Path) -> anyhow::Result<(usize, usize)> {
    let catalog = load_catalog(path)?;
    let unnamed = catalog.iter().filter(|stop| stop.name.is_none()).count();
    Ok((catalog.len(), unnamed))
}
