use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{ScanDataset, ScanRecord, ScanSet, ScanType};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Outcome of loading every configured input.
#[derive(Debug)]
pub struct LoadOutcome {
    pub datasets: ScanSet,
    /// Inputs that were absent on disk, in configuration order.
    pub skipped: Vec<LoadError>,
}

/// Load every `(scan type, path)` input.
///
/// Missing files are logged once each and skipped. Anything else that goes
/// wrong with a file that does exist is returned as an error. When nothing
/// loads at all the result is [`LoadError::NoInputs`].
pub fn load_all(inputs: &[(ScanType, PathBuf)]) -> Result<LoadOutcome> {
    let mut datasets = ScanSet::new();
    let mut skipped = Vec::new();

    for (scan_type, path) in inputs {
        match load_file(*scan_type, path) {
            Ok(dataset) => {
                log::info!("Loaded {scan_type} scan: {} records", dataset.len());
                datasets.insert(*scan_type, dataset);
            }
            Err(err @ LoadError::MissingInputFile { .. }) => {
                log::warn!("{err}");
                skipped.push(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    if datasets.is_empty() {
        return Err(LoadError::NoInputs)
            .context("make sure the scan CSV files are in the dataset directory");
    }

    Ok(LoadOutcome { datasets, skipped })
}

/// Parse one scan export into a [`ScanDataset`].
pub fn load_file(scan_type: ScanType, path: &Path) -> Result<ScanDataset, LoadError> {
    let malformed = |source: csv::Error| LoadError::MalformedInput {
        scan_type,
        path: path.to_path_buf(),
        source,
    };

    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(err) if is_not_found(&err) => {
            return Err(LoadError::MissingInputFile {
                scan_type,
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(malformed(err)),
    };

    let records = reader
        .deserialize::<ScanRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(malformed)?;

    Ok(ScanDataset::new(scan_type, records))
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound)
}
