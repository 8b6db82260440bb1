use std::collections::HashMap;

use super::model::{ScanDataset, ScanRecord};
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Descriptive statistics over one numeric column
// ---------------------------------------------------------------------------

/// Count, mean, sample standard deviation and range of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1). `NaN` for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Returns `None` for an empty column.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = if values.len() < 2 {
            f64::NAN
        } else {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// Statistics of `TotalResponseTimeMs` for a dataset.
pub fn response_time_stats(dataset: &ScanDataset) -> Result<ColumnStats, ReportError> {
    ColumnStats::from_values(&dataset.response_times()).ok_or(ReportError::EmptyDataset {
        scan_type: dataset.scan_type,
        statistic: "response time statistics",
    })
}

/// Mean of an arbitrary numeric column.
pub fn column_mean(
    dataset: &ScanDataset,
    statistic: &'static str,
    field: impl Fn(&ScanRecord) -> f64,
) -> Result<f64, ReportError> {
    ColumnStats::from_values(&dataset.column(field))
        .map(|s| s.mean)
        .ok_or(ReportError::EmptyDataset {
            scan_type: dataset.scan_type,
            statistic,
        })
}

// ---------------------------------------------------------------------------
// Box-plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary plus outliers, using the conventional 1.5 × IQR rule.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation at or above `q1 - 1.5 * iqr`.
    pub whisker_low: f64,
    /// Largest observation at or below `q3 + 1.5 * iqr`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        // Whiskers never retract inside the box.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1)
            .min(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3)
            .max(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Lowest and highest value the box plot draws.
    pub fn extent(&self) -> (f64, f64) {
        let low = self.outliers.iter().copied().fold(self.whisker_low, f64::min);
        let high = self.outliers.iter().copied().fold(self.whisker_high, f64::max);
        (low, high)
    }
}

/// Percentile of pre-sorted data with linear interpolation between ranks.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Value frequencies
// ---------------------------------------------------------------------------

/// The `limit` most frequent strings with their counts, most frequent first.
/// Equal counts keep the order in which the values were first seen.
pub fn top_frequencies<'a, I>(values: I, limit: usize) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for value in values {
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
