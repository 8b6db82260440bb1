use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// ScanType – the three scan depths being compared
// ---------------------------------------------------------------------------

/// Depth of a sandboxing scan. The derived `Ord` follows declaration order,
/// which is also the order every table and chart lists the scan types in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScanType {
    Shallow,
    Medium,
    Deep,
}

impl ScanType {
    pub const ALL: [ScanType; 3] = [ScanType::Shallow, ScanType::Medium, ScanType::Deep];

    pub fn label(self) -> &'static str {
        match self {
            ScanType::Shallow => "Shallow",
            ScanType::Medium => "Medium",
            ScanType::Deep => "Deep",
        }
    }

    /// Position in [`ScanType::ALL`]; used to index the fixed colour table.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ScanRecord – one row of a scan export
// ---------------------------------------------------------------------------

/// One scanned file. Columns are matched by header name; anything else in
/// the CSV is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanRecord {
    #[serde(rename = "TotalResponseTimeMs")]
    pub total_response_time_ms: f64,
    #[serde(rename = "RiskScore")]
    pub risk_score: f64,
    #[serde(rename = "FilePath")]
    pub file_path: String,
    #[serde(rename = "DetectionLatencyMs")]
    pub detection_latency_ms: f64,
    #[serde(rename = "QuarantineLatencyMs")]
    pub quarantine_latency_ms: f64,
    #[serde(rename = "AnalysisLatencyMs")]
    pub analysis_latency_ms: f64,
}

impl ScanRecord {
    /// A file counts as detected when it was assigned any positive risk.
    pub fn is_detection(&self) -> bool {
        self.risk_score > 0.0
    }
}

// ---------------------------------------------------------------------------
// ScanDataset – all rows loaded from one file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScanDataset {
    pub scan_type: ScanType,
    pub records: Vec<ScanRecord>,
}

impl ScanDataset {
    pub fn new(scan_type: ScanType, records: Vec<ScanRecord>) -> Self {
        Self { scan_type, records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of records with a positive risk score.
    pub fn detected_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_detection()).count()
    }

    pub fn response_times(&self) -> Vec<f64> {
        self.column(|r| r.total_response_time_ms)
    }

    /// Project a numeric column out of the rows.
    pub fn column(&self, field: impl Fn(&ScanRecord) -> f64) -> Vec<f64> {
        self.records.iter().map(field).collect()
    }
}

/// Loaded datasets keyed by scan type. Iteration follows [`ScanType`] order.
pub type ScanSet = BTreeMap<ScanType, ScanDataset>;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(response_ms: f64, risk: f64, path: &str) -> ScanRecord {
        ScanRecord {
            total_response_time_ms: response_ms,
            risk_score: risk,
            file_path: path.to_string(),
            detection_latency_ms: response_ms * 0.2,
            quarantine_latency_ms: response_ms * 0.3,
            analysis_latency_ms: response_ms * 0.5,
        }
    }

    /// Dataset with `n` rows whose response times are `base, base+1, ...`
    /// and whose first `detected` rows carry a positive risk score.
    pub fn dataset(scan_type: ScanType, n: usize, base: f64, detected: usize) -> ScanDataset {
        let records = (0..n)
            .map(|i| {
                let risk = if i < detected { 50.0 } else { 0.0 };
                record(base + i as f64, risk, &format!("C:\\ProgramData\\sample_{}.wsb", i % 3))
            })
            .collect();
        ScanDataset::new(scan_type, records)
    }

    pub fn triad(shallow: usize, medium: usize, deep: usize) -> ScanSet {
        [
            dataset(ScanType::Shallow, shallow, 100.0, shallow / 2),
            dataset(ScanType::Medium, medium, 200.0, medium / 2),
            dataset(ScanType::Deep, deep, 400.0, deep / 2),
        ]
        .into_iter()
        .map(|ds| (ds.scan_type, ds))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn scan_types_order_shallow_to_deep() {
        let mut types = vec![ScanType::Deep, ScanType::Shallow, ScanType::Medium];
        types.sort();
        assert_eq!(types, ScanType::ALL.to_vec());
        assert_eq!(ScanType::Deep.ordinal(), 2);
        assert_eq!(ScanType::Medium.to_string(), "Medium");
    }

    #[test]
    fn detected_count_requires_positive_risk() {
        let ds = ScanDataset::new(
            ScanType::Shallow,
            vec![record(1.0, 0.0, "a"), record(2.0, 0.5, "b"), record(3.0, -1.0, "c")],
        );
        assert_eq!(ds.detected_count(), 1);
        assert_eq!(ds.response_times(), vec![1.0, 2.0, 3.0]);
        assert_eq!(ds.len(), 3);
    }
}
