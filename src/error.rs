use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::ScanType;

/// Failures while reading the scan exports.
///
/// `MissingInputFile` is the only recoverable kind: the loader records it
/// and moves on. The others abort the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {} ({scan_type} scan skipped)", path.display())]
    MissingInputFile { scan_type: ScanType, path: PathBuf },

    #[error("no scan files could be loaded")]
    NoInputs,

    #[error("malformed {scan_type} scan file {}: {source}", path.display())]
    MalformedInput {
        scan_type: ScanType,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures while computing statistics and derived metrics.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{scan_type} scan has no records; cannot compute {statistic}")]
    EmptyDataset {
        scan_type: ScanType,
        statistic: &'static str,
    },

    #[error("{0} scan was not loaded but is required for the comparative findings")]
    MissingScanType(ScanType),

    #[error("cannot compute {0}: denominator is zero")]
    ZeroDenominator(&'static str),
}
