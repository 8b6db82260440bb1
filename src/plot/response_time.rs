use std::path::PathBuf;

use anyhow::Result;
use plotters::prelude::*;

use super::{category_label, category_range, headroom, ms_label, render_png, Styles};
use crate::color::{over_white, scan_color, GRID};
use crate::config::{ReportConfig, CHART_FILES};
use crate::data::model::{ScanSet, ScanType};
use crate::data::stats::{response_time_stats, BoxStats, ColumnStats};
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// 01 – mean response time per scan type
// ---------------------------------------------------------------------------

/// Mean and spread of `TotalResponseTimeMs` for each loaded scan type.
#[derive(Debug, Clone)]
pub struct ResponseTimeComparison {
    pub bars: Vec<(ScanType, ColumnStats)>,
}

impl ResponseTimeComparison {
    pub fn aggregate(datasets: &ScanSet) -> Result<Self, ReportError> {
        let bars = datasets
            .values()
            .map(|ds| Ok((ds.scan_type, response_time_stats(ds)?)))
            .collect::<Result<Vec<_>, ReportError>>()?;
        Ok(Self { bars })
    }

    /// Mean response time of `scan_type`, if it was loaded.
    #[cfg(test)]
    pub fn mean_of(&self, scan_type: ScanType) -> Option<f64> {
        self.bars
            .iter()
            .find(|(t, _)| *t == scan_type)
            .map(|(_, s)| s.mean)
    }

    pub fn render(&self, config: &ReportConfig) -> Result<PathBuf> {
        let path = config.chart_path(CHART_FILES[0]);
        let styles = Styles::new(config.theme);
        let labels: Vec<&str> = self.bars.iter().map(|(t, _)| t.label()).collect();
        let top = self.bars.iter().map(|(_, s)| s.mean).fold(0.0, f64::max);

        render_png(&path, config.theme.figure_px((10.0, 6.0)), |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Scan Speed Comparison: Shallow vs Medium vs Deep", styles.title())
                .margin(styles.px(12.0))
                .x_label_area_size(styles.px(40.0))
                .y_label_area_size(styles.px(60.0))
                .build_cartesian_2d(category_range(labels.len()), 0.0..headroom(top))?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .bold_line_style(GRID)
                .light_line_style(TRANSPARENT)
                .axis_style(GRID)
                .label_style(styles.tick_label())
                .axis_desc_style(styles.heading())
                .x_desc("Scan Type")
                .y_desc("Average Response Time (ms)")
                .x_labels(labels.len())
                .x_label_formatter(&|v| category_label(&labels, *v))
                .draw()?;

            for (idx, (scan_type, stats)) in self.bars.iter().enumerate() {
                let x = idx as f64;
                let corners = [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, stats.mean)];
                let color = scan_color(*scan_type);

                chart.draw_series([
                    Rectangle::new(corners, over_white(color, 0.8).filled()),
                    Rectangle::new(corners, styles.edge(1.5)),
                ])?;
                chart.draw_series(std::iter::once(Text::new(
                    ms_label(stats.mean),
                    (x, stats.mean),
                    styles.value_label(12.0),
                )))?;
            }
            Ok(())
        })?;

        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// 02 – response time distribution
// ---------------------------------------------------------------------------

/// Box-plot summary of `TotalResponseTimeMs` per loaded scan type.
#[derive(Debug, Clone)]
pub struct ResponseTimeDistribution {
    pub boxes: Vec<(ScanType, BoxStats)>,
}

impl ResponseTimeDistribution {
    pub fn aggregate(datasets: &ScanSet) -> Result<Self, ReportError> {
        let boxes = datasets
            .values()
            .map(|ds| {
                BoxStats::from_values(&ds.response_times())
                    .map(|stats| (ds.scan_type, stats))
                    .ok_or(ReportError::EmptyDataset {
                        scan_type: ds.scan_type,
                        statistic: "response time distribution",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { boxes })
    }

    pub fn render(&self, config: &ReportConfig) -> Result<PathBuf> {
        let path = config.chart_path(CHART_FILES[1]);
        let styles = Styles::new(config.theme);
        let labels: Vec<&str> = self.boxes.iter().map(|(t, _)| t.label()).collect();

        let (low, high) = self
            .boxes
            .iter()
            .map(|(_, b)| b.extent())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (l, h)| (lo.min(l), hi.max(h)));
        let pad = ((high - low) * 0.05).max(1.0);
        let y_range = (low - pad).max(0.0)..high + pad;

        render_png(&path, config.theme.figure_px((10.0, 6.0)), |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Response Time Distribution Across Scan Types", styles.title())
                .margin(styles.px(12.0))
                .x_label_area_size(styles.px(30.0))
                .y_label_area_size(styles.px(60.0))
                .build_cartesian_2d(category_range(labels.len()), y_range)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .bold_line_style(GRID)
                .light_line_style(TRANSPARENT)
                .axis_style(GRID)
                .label_style(styles.tick_label())
                .axis_desc_style(styles.heading())
                .y_desc("Response Time (ms)")
                .x_labels(labels.len())
                .x_label_formatter(&|v| category_label(&labels, *v))
                .draw()?;

            let line = BLACK.stroke_width(styles.px(1.0));
            for (idx, (scan_type, stats)) in self.boxes.iter().enumerate() {
                let x = idx as f64;
                let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
                let (cap_left, cap_right) = (x - CAP_HALF_WIDTH, x + CAP_HALF_WIDTH);

                chart.draw_series([
                    Rectangle::new(
                        [(left, stats.q1), (right, stats.q3)],
                        over_white(scan_color(*scan_type), 0.7).filled(),
                    ),
                    Rectangle::new([(left, stats.q1), (right, stats.q3)], line),
                ])?;

                chart.draw_series([
                    PathElement::new(
                        vec![(left, stats.median), (right, stats.median)],
                        BLACK.stroke_width(styles.px(2.0)),
                    ),
                    PathElement::new(vec![(x, stats.whisker_low), (x, stats.q1)], line),
                    PathElement::new(vec![(x, stats.q3), (x, stats.whisker_high)], line),
                    PathElement::new(
                        vec![(cap_left, stats.whisker_low), (cap_right, stats.whisker_low)],
                        line,
                    ),
                    PathElement::new(
                        vec![(cap_left, stats.whisker_high), (cap_right, stats.whisker_high)],
                        line,
                    ),
                ])?;

                chart.draw_series(
                    stats
                        .outliers
                        .iter()
                        .map(|v| Circle::new((x, *v), styles.px(3.0), line)),
                )?;
            }
            Ok(())
        })?;

        Ok(path)
    }
}

const BAR_HALF_WIDTH: f64 = 0.3;
const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.12;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures;

    #[test]
    fn comparison_uses_every_loaded_scan_in_order() {
        let datasets = fixtures::triad(4, 5, 6);
        let chart = ResponseTimeComparison::aggregate(&datasets).unwrap();

        let types: Vec<_> = chart.bars.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, ScanType::ALL.to_vec());
        // 100, 101, 102, 103
        assert_eq!(chart.mean_of(ScanType::Shallow), Some(101.5));
        // 400..=405
        assert_eq!(chart.mean_of(ScanType::Deep), Some(402.5));
    }

    #[test]
    fn comparison_skips_unloaded_scan_types() {
        let mut datasets = fixtures::triad(4, 5, 6);
        datasets.remove(&ScanType::Medium);
        let chart = ResponseTimeComparison::aggregate(&datasets).unwrap();
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.mean_of(ScanType::Medium), None);
    }

    #[test]
    fn distribution_rejects_empty_dataset() {
        let mut datasets = fixtures::triad(4, 5, 6);
        datasets.insert(ScanType::Deep, fixtures::dataset(ScanType::Deep, 0, 0.0, 0));
        assert!(matches!(
            ResponseTimeDistribution::aggregate(&datasets),
            Err(ReportError::EmptyDataset { scan_type: ScanType::Deep, .. })
        ));
    }
}
