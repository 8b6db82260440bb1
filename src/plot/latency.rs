use std::path::PathBuf;

use anyhow::Result;
use plotters::prelude::*;

use super::{category_label, category_range, headroom, ms_label, render_png, Styles};
use crate::color::{over_white, COMPONENT_COLORS, GRID};
use crate::config::{ReportConfig, CHART_FILES};
use crate::data::model::{ScanDataset, ScanSet, ScanType};
use crate::data::stats::column_mean;
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// 05 – where the response time goes
// ---------------------------------------------------------------------------

/// Bar labels, in the order of [`LatencyPanel::components`].
pub const COMPONENTS: [&str; 3] = ["Detection", "Quarantine", "Analysis"];

/// Outline width of each bar, in points.
const EDGE_PT: f64 = 1.5;

/// Mean detection, quarantine and analysis latency of one scan type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyPanel {
    pub scan_type: ScanType,
    pub components: [f64; 3],
}

impl LatencyPanel {
    pub fn from_dataset(ds: &ScanDataset) -> Result<Self, ReportError> {
        Ok(Self {
            scan_type: ds.scan_type,
            components: [
                column_mean(ds, "detection latency", |r| r.detection_latency_ms)?,
                column_mean(ds, "quarantine latency", |r| r.quarantine_latency_ms)?,
                column_mean(ds, "analysis latency", |r| r.analysis_latency_ms)?,
            ],
        })
    }
}

#[derive(Debug, Clone)]
pub struct LatencyBreakdown {
    pub panels: Vec<LatencyPanel>,
}

impl LatencyBreakdown {
    pub fn aggregate(datasets: &ScanSet) -> Result<Self, ReportError> {
        let panels = datasets
            .values()
            .map(LatencyPanel::from_dataset)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { panels })
    }

    pub fn render(&self, config: &ReportConfig) -> Result<PathBuf> {
        let path = config.chart_path(CHART_FILES[4]);
        let styles = Styles::new(config.theme);

        render_png(&path, config.theme.figure_px((15.0, 5.0)), |root| {
            let root = root.margin(styles.px(6.0), styles.px(6.0), styles.px(6.0), styles.px(6.0));
            let areas = root.split_evenly((1, self.panels.len().max(1)));

            for (panel, area) in self.panels.iter().zip(areas.iter()) {
                let top = panel.components.iter().copied().fold(0.0, f64::max);

                let mut chart = ChartBuilder::on(area)
                    .caption(format!("{} Scan", panel.scan_type), styles.heading())
                    .margin(styles.px(8.0))
                    .x_label_area_size(styles.px(24.0))
                    .y_label_area_size(styles.px(50.0))
                    .build_cartesian_2d(category_range(COMPONENTS.len()), 0.0..headroom(top))?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .bold_line_style(GRID)
                    .light_line_style(TRANSPARENT)
                    .axis_style(GRID)
                    .label_style(styles.tick_label())
                    .axis_desc_style(styles.heading())
                    .y_desc("Latency (ms)")
                    .x_labels(COMPONENTS.len())
                    .x_label_formatter(&|v| category_label(&COMPONENTS, *v))
                    .draw()?;

                let bars = panel.components.iter().zip(COMPONENT_COLORS).enumerate();
                for (idx, (value, color)) in bars {
                    let x = idx as f64;
                    let corners = [(x - 0.35, 0.0), (x + 0.35, *value)];
                    chart.draw_series([
                        Rectangle::new(corners, over_white(color, 0.8).filled()),
                        Rectangle::new(corners, styles.edge(EDGE_PT)),
                    ])?;
                    chart.draw_series(std::iter::once(Text::new(
                        ms_label(*value),
                        (x, *value),
                        styles.value_label(10.0),
                    )))?;
                }
            }
            Ok(())
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures;

    #[test]
    fn components_are_column_means() {
        // response times 100, 101, 102, 103
        let ds = fixtures::dataset(ScanType::Shallow, 4, 100.0, 2);
        let panel = LatencyPanel::from_dataset(&ds).unwrap();

        let [detection, quarantine, analysis] = panel.components;
        assert!((detection - 101.5 * 0.2).abs() < 1e-9);
        assert!((quarantine - 101.5 * 0.3).abs() < 1e-9);
        assert!((analysis - 101.5 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn bars_are_outlined_in_black() {
        let styles = Styles::new(crate::config::Theme::default());
        let edge = styles.edge(EDGE_PT);
        assert_eq!(edge.color, BLACK.to_rgba());
        assert_eq!(edge.stroke_width, styles.px(1.5));
        assert_ne!(edge.color, crate::color::to_rgb(COMPONENT_COLORS[0]).to_rgba());
    }

    #[test]
    fn one_panel_per_loaded_scan() {
        let mut datasets = fixtures::triad(3, 3, 3);
        datasets.remove(&ScanType::Shallow);
        let chart = LatencyBreakdown::aggregate(&datasets).unwrap();
        let types: Vec<_> = chart.panels.iter().map(|p| p.scan_type).collect();
        assert_eq!(types, [ScanType::Medium, ScanType::Deep]);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let mut datasets = ScanSet::new();
        datasets.insert(ScanType::Deep, fixtures::dataset(ScanType::Deep, 0, 0.0, 0));
        assert!(matches!(
            LatencyBreakdown::aggregate(&datasets),
            Err(ReportError::EmptyDataset { scan_type: ScanType::Deep, .. })
        ));
    }
}
