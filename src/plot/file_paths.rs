use std::path::PathBuf;

use anyhow::Result;
use plotters::prelude::*;

use super::{category_label, category_range, headroom, render_png, Styles};
use crate::color::{over_white, scan_color, GRID};
use crate::config::{ReportConfig, CHART_FILES, PATH_LABEL_LEN, PATH_PREFIX, TOP_PATHS};
use crate::data::model::{ScanDataset, ScanSet, ScanType};
use crate::data::stats::top_frequencies;

// ---------------------------------------------------------------------------
// 04 – where in the file system detections happen
// ---------------------------------------------------------------------------

/// Most frequent `FilePath` values of one scan type.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPanel {
    pub scan_type: ScanType,
    pub total_records: usize,
    /// Full path and occurrence count, most frequent first.
    pub top_paths: Vec<(String, usize)>,
}

impl PathPanel {
    pub fn from_dataset(dataset: &ScanDataset) -> Self {
        let top_paths = top_frequencies(dataset.records.iter().map(|r| r.file_path.as_str()), TOP_PATHS)
            .into_iter()
            .map(|(path, count)| (path.to_string(), count))
            .collect();
        Self {
            scan_type: dataset.scan_type,
            total_records: dataset.len(),
            top_paths,
        }
    }

    /// Display labels for [`Self::top_paths`], in the same order.
    pub fn labels(&self) -> Vec<String> {
        self.top_paths.iter().map(|(path, _)| path_label(path)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct FilePathDistribution {
    pub panels: Vec<PathPanel>,
}

impl FilePathDistribution {
    pub fn aggregate(datasets: &ScanSet) -> Self {
        Self {
            panels: datasets.values().map(PathPanel::from_dataset).collect(),
        }
    }

    pub fn render(&self, config: &ReportConfig) -> Result<PathBuf> {
        let path = config.chart_path(CHART_FILES[3]);
        let styles = Styles::new(config.theme);

        render_png(&path, config.theme.figure_px((16.0, 5.0)), |root| {
            let areas = root.margin(styles.px(6.0), styles.px(6.0), styles.px(6.0), styles.px(6.0));
            let areas = areas.split_evenly((1, self.panels.len().max(1)));

            for (panel, area) in self.panels.iter().zip(areas.iter()) {
                let area = area
                    .titled(&format!("{} Scan", panel.scan_type), styles.heading())?
                    .titled(&format!("({} total detections)", panel.total_records), styles.heading())?;

                let labels = panel.labels();
                let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
                let top = panel.top_paths.first().map(|(_, c)| *c as f64).unwrap_or(0.0);

                let mut chart = ChartBuilder::on(&area)
                    .margin(styles.px(6.0))
                    .x_label_area_size(styles.px(30.0))
                    .y_label_area_size(styles.px(130.0))
                    .build_cartesian_2d(0.0..headroom(top), category_range(label_refs.len().max(1)))?;

                chart
                    .configure_mesh()
                    .disable_y_mesh()
                    .bold_line_style(GRID)
                    .light_line_style(TRANSPARENT)
                    .axis_style(GRID)
                    .x_label_style(styles.tick_label())
                    .y_label_style(styles.small_label())
                    .axis_desc_style(styles.heading())
                    .x_desc("Detection Count")
                    .y_labels(label_refs.len().max(1))
                    .y_label_formatter(&|v| category_label(&label_refs, *v))
                    .draw()?;

                let fill = over_white(scan_color(panel.scan_type), 0.8).filled();
                let edge = styles.edge(1.0);
                for (idx, (_, count)) in panel.top_paths.iter().enumerate() {
                    let y = idx as f64;
                    let corners = [(0.0, y - 0.4), (*count as f64, y + 0.4)];
                    chart.draw_series([Rectangle::new(corners, fill), Rectangle::new(corners, edge)])?;
                }
            }
            Ok(())
        })?;

        Ok(path)
    }
}

/// Axis label for a file path: every occurrence of the common prefix removed,
/// then cut to a fixed number of characters.
pub fn path_label(path: &str) -> String {
    path.replace(PATH_PREFIX, "").chars().take(PATH_LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    #[test]
    fn panel_keeps_top_eight_with_first_seen_ties() {
        let paths = [
            "p1", "p2", "p3", "p2", "p4", "p5", "p6", "p7", "p8", "p9", "p3", "p10", "p2",
        ];
        let ds = ScanDataset::new(
            ScanType::Medium,
            paths.iter().map(|p| record(1.0, 1.0, p)).collect(),
        );
        let panel = PathPanel::from_dataset(&ds);

        assert_eq!(panel.total_records, 13);
        assert_eq!(panel.top_paths.len(), 8);
        let names: Vec<&str> = panel.top_paths.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, ["p2", "p3", "p1", "p4", "p5", "p6", "p7", "p8"]);
        assert_eq!(panel.top_paths[0].1, 3);
        assert_eq!(panel.top_paths[1].1, 2);
    }

    #[test]
    fn labels_strip_prefix_and_truncate_without_touching_data() {
        let long = r"C:\ProgramData\Sandbox\Samples\very_long_sample_name_0001.wsb";
        let ds = ScanDataset::new(ScanType::Deep, vec![record(1.0, 1.0, long)]);
        let panel = PathPanel::from_dataset(&ds);

        let label = &panel.labels()[0];
        assert_eq!(label, r"Sandbox\Samples\very_long_samp");
        assert_eq!(label.chars().count(), 30);
        assert_eq!(panel.top_paths[0].0, long);
        assert_eq!(ds.records[0].file_path, long);
    }

    #[test]
    fn short_paths_are_left_alone() {
        assert_eq!(path_label(r"D:\temp\x.wsb"), r"D:\temp\x.wsb");
        assert_eq!(path_label(r"C:\ProgramData\a.wsb"), "a.wsb");
    }
}
