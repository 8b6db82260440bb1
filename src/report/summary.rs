use comfy_table::Table;

use super::{banner, fixed, plain_table};
use crate::data::model::{ScanSet, ScanType};
use crate::data::stats::{column_mean, response_time_stats, ColumnStats};
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Statistics table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsRow {
    pub scan_type: ScanType,
    pub response: ColumnStats,
    pub mean_risk: f64,
}

impl StatisticsRow {
    fn cells(&self) -> [String; 7] {
        [
            self.scan_type.to_string(),
            self.response.count.to_string(),
            format!("{:.2}", self.response.mean),
            shortest(self.response.min),
            shortest(self.response.max),
            fixed(self.response.std_dev, 2),
            format!("{:.2}", self.mean_risk),
        ]
    }
}

pub fn statistics_rows(datasets: &ScanSet) -> Result<Vec<StatisticsRow>, ReportError> {
    datasets
        .values()
        .map(|ds| {
            Ok(StatisticsRow {
                scan_type: ds.scan_type,
                response: response_time_stats(ds)?,
                mean_risk: column_mean(ds, "average risk score", |r| r.risk_score)?,
            })
        })
        .collect()
}

pub fn statistics_table(rows: &[StatisticsRow]) -> Table {
    plain_table(
        [
            "Scan Type",
            "Test Files",
            "Avg Response Time (ms)",
            "Min Response Time (ms)",
            "Max Response Time (ms)",
            "Std Dev (ms)",
            "Avg Risk Score",
        ],
        rows.iter().map(StatisticsRow::cells),
    )
}

pub fn render_statistics(rows: &[StatisticsRow]) -> String {
    let mut out = banner("SUMMARY STATISTICS FOR RESEARCH PAPER");
    out.push_str(&format!("{}\n", statistics_table(rows)));
    out
}

/// Shortest text that reads back as the same number, always with a decimal
/// point (`120.0`, `98.25`).
fn shortest(value: f64) -> String {
    format!("{value:?}")
}

// ---------------------------------------------------------------------------
// Coverage and speed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageRow {
    pub scan_type: ScanType,
    pub test_files: usize,
    pub files_detected: usize,
    pub mean_response_ms: f64,
}

impl CoverageRow {
    /// Share of files with a positive risk score, in percent. Zero for an
    /// empty scan.
    pub fn detection_rate(&self) -> f64 {
        if self.test_files == 0 {
            0.0
        } else {
            self.files_detected as f64 / self.test_files as f64 * 100.0
        }
    }

    fn response_label(&self) -> String {
        format!("{:.2}ms ({:.3}s)", self.mean_response_ms, self.mean_response_ms / 1000.0)
    }

    fn bullets(&self) -> String {
        format!(
            "  {} SCAN:\n    • Tested {} sample .wsb files\n    • Detected {} malicious threats\n    • Detection rate: {:.1}%\n    • Average response time: {}\n\n",
            self.scan_type.label().to_uppercase(),
            self.test_files,
            self.files_detected,
            self.detection_rate(),
            self.response_label(),
        )
    }
}

pub fn coverage_rows(datasets: &ScanSet) -> Result<Vec<CoverageRow>, ReportError> {
    datasets
        .values()
        .map(|ds| {
            Ok(CoverageRow {
                scan_type: ds.scan_type,
                test_files: ds.len(),
                files_detected: ds.detected_count(),
                mean_response_ms: response_time_stats(ds)?.mean,
            })
        })
        .collect()
}

pub fn coverage_table(rows: &[CoverageRow]) -> Table {
    plain_table(
        [
            "Scan Type",
            "Test Files",
            "Files Detected",
            "Detection Rate",
            "Avg Response Time",
        ],
        rows.iter().map(|row| {
            [
                row.scan_type.to_string(),
                row.test_files.to_string(),
                row.files_detected.to_string(),
                format!("{:.1}%", row.detection_rate()),
                row.response_label(),
            ]
        }),
    )
}

pub fn render_coverage(rows: &[CoverageRow]) -> String {
    let mut out = banner("SCAN COVERAGE AND SPEED (for your report)");
    out.push_str("\nUse this format for your research paper:\n\n");
    for row in rows {
        out.push_str(&row.bullets());
    }
    out.push_str("\nSummary Table:\n");
    out.push_str(&format!("{}\n", coverage_table(rows)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures;

    #[test]
    fn detection_rate_counts_positive_risk_rows() {
        let mut datasets = ScanSet::new();
        datasets.insert(
            ScanType::Shallow,
            fixtures::dataset(ScanType::Shallow, 10, 100.0, 3),
        );
        let rows = coverage_rows(&datasets).unwrap();

        assert_eq!(rows[0].test_files, 10);
        assert_eq!(rows[0].files_detected, 3);
        assert_eq!(format!("{:.1}%", rows[0].detection_rate()), "30.0%");
        assert!(render_coverage(&rows).contains("    • Detection rate: 30.0%\n"));
    }

    #[test]
    fn empty_scan_has_zero_detection_rate() {
        let row = CoverageRow {
            scan_type: ScanType::Deep,
            test_files: 0,
            files_detected: 0,
            mean_response_ms: 0.0,
        };
        assert_eq!(row.detection_rate(), 0.0);
    }

    #[test]
    fn coverage_section_layout() {
        let datasets = fixtures::triad(5, 5, 5);
        let text = render_coverage(&coverage_rows(&datasets).unwrap());

        assert!(text.starts_with(&format!("\n{}\n", "=".repeat(80))));
        assert!(text.contains("  MEDIUM SCAN:\n    • Tested 5 sample .wsb files\n"));
        // 400..=404
        assert!(text.contains("    • Average response time: 402.00ms (0.402s)\n"));
        assert!(text.contains("\nSummary Table:\nScan Type  Test Files  Files Detected"));
        let shallow = text.lines().rfind(|l| l.trim_start().starts_with("Shallow")).unwrap();
        assert!(shallow.trim_end().ends_with("40.0%  102.00ms (0.102s)"));
    }

    #[test]
    fn statistics_cells_use_fixed_precision() {
        let datasets = fixtures::triad(4, 1, 4);
        let rows = statistics_rows(&datasets).unwrap();
        let shallow = rows[0].cells();

        assert_eq!(shallow[0], "Shallow");
        assert_eq!(shallow[1], "4");
        assert_eq!(shallow[2], "101.50");
        assert_eq!(shallow[3], "100.0");
        assert_eq!(shallow[4], "103.0");
        assert_eq!(shallow[5], "1.29");
        // first two of four rows carry risk 50
        assert_eq!(shallow[6], "25.00");

        // a single row has no sample deviation
        assert_eq!(rows[1].cells()[5], "nan");
    }

    #[test]
    fn statistics_section_lists_every_loaded_scan() {
        let mut datasets = fixtures::triad(2, 2, 2);
        datasets.remove(&ScanType::Medium);
        let text = render_statistics(&statistics_rows(&datasets).unwrap());

        assert!(text.contains("SUMMARY STATISTICS FOR RESEARCH PAPER"));
        assert_eq!(statistics_table(&statistics_rows(&datasets).unwrap()).row_iter().count(), 2);
        assert!(!text.contains("Medium"));
    }
}
