//! Fixed run configuration.
//!
//! Nothing here is read from the command line or a file: the report always
//! uses the same inputs, outputs and look. Tests build their own values to
//! point at scratch directories.

use std::path::PathBuf;

use crate::data::model::ScanType;

/// Output file names, in the order the charts are produced.
pub const CHART_FILES: [&str; 5] = [
    "01_response_time_comparison.png",
    "02_response_time_distribution.png",
    "03_detection_vs_speed.png",
    "04_file_path_distribution.png",
    "05_latency_breakdown.png",
];

/// Prefix stripped from file paths before they are used as axis labels.
pub const PATH_PREFIX: &str = "C:\\ProgramData\\";

/// Maximum characters of a file path label.
pub const PATH_LABEL_LEN: usize = 30;

/// How many distinct file paths each panel of the path chart shows.
pub const TOP_PATHS: usize = 8;

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// One CSV export per scan type, loaded in this order.
    pub inputs: Vec<(ScanType, PathBuf)>,
    /// Directory the PNG charts are written to.
    pub output_dir: PathBuf,
    pub theme: Theme,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            inputs: vec![
                (ScanType::Shallow, PathBuf::from("dataset/100shallow.csv")),
                (ScanType::Medium, PathBuf::from("dataset/100med.csv")),
                (ScanType::Deep, PathBuf::from("dataset/100deep.csv")),
            ],
            output_dir: PathBuf::from("."),
            theme: Theme::default(),
        }
    }
}

impl ReportConfig {
    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Figure resolution and type sizes. Sizes are in points and converted to
/// pixels through `dpi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub dpi: u32,
    pub font_pt: f64,
    pub title_pt: f64,
    pub axis_desc_pt: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dpi: 300,
            font_pt: 11.0,
            title_pt: 14.0,
            axis_desc_pt: 12.0,
        }
    }
}

impl Theme {
    /// Pixel size of a figure measured in inches.
    pub fn figure_px(&self, (width_in, height_in): (f64, f64)) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        ((width_in * dpi).round() as u32, (height_in * dpi).round() as u32)
    }

    /// Pixel height of a type size given in points.
    pub fn pt(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    /// Pixel length given in points, rounded for layout APIs.
    pub fn px(&self, points: f64) -> u32 {
        self.pt(points).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs_cover_every_scan_type_in_order() {
        let config = ReportConfig::default();
        let types: Vec<_> = config.inputs.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, ScanType::ALL.to_vec());
        assert_eq!(config.inputs[1].1, PathBuf::from("dataset/100med.csv"));
    }

    #[test]
    fn theme_scales_with_dpi() {
        let theme = Theme::default();
        assert_eq!(theme.figure_px((10.0, 6.0)), (3000, 1800));
        assert_eq!(theme.px(72.0), 300);

        let draft = Theme { dpi: 72, ..theme };
        assert_eq!(draft.pt(11.0), 11.0);
    }
}
