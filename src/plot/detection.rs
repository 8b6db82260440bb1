use std::path::PathBuf;

use anyhow::Result;
use plotters::prelude::*;

use super::{render_png, Styles};
use crate::color::{over_white, scan_color, GRID};
use crate::config::{ReportConfig, CHART_FILES};
use crate::data::model::{ScanSet, ScanType};
use crate::data::stats::response_time_stats;
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// 03 – detection count against speed
// ---------------------------------------------------------------------------

/// One point per scan type: how long it took on average and how many
/// records it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPoint {
    pub scan_type: ScanType,
    pub mean_response_ms: f64,
    pub detections: usize,
}

#[derive(Debug, Clone)]
pub struct DetectionVsSpeed {
    pub points: Vec<DetectionPoint>,
}

impl DetectionVsSpeed {
    pub fn aggregate(datasets: &ScanSet) -> Result<Self, ReportError> {
        let points = datasets
            .values()
            .map(|ds| {
                Ok(DetectionPoint {
                    scan_type: ds.scan_type,
                    mean_response_ms: response_time_stats(ds)?.mean,
                    detections: ds.len(),
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;
        Ok(Self { points })
    }

    pub fn render(&self, config: &ReportConfig) -> Result<PathBuf> {
        let path = config.chart_path(CHART_FILES[2]);
        let styles = Styles::new(config.theme);

        let x_range = padded(self.points.iter().map(|p| p.mean_response_ms));
        let y_range = padded(self.points.iter().map(|p| p.detections as f64));
        let radius = styles.px(9.8);

        render_png(&path, config.theme.figure_px((10.0, 6.0)), |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Detection Efficiency: Speed vs Detection Count", styles.title())
                .margin(styles.px(12.0))
                .x_label_area_size(styles.px(40.0))
                .y_label_area_size(styles.px(50.0))
                .build_cartesian_2d(x_range, y_range)?;

            chart
                .configure_mesh()
                .bold_line_style(GRID)
                .light_line_style(TRANSPARENT)
                .axis_style(GRID)
                .label_style(styles.tick_label())
                .axis_desc_style(styles.heading())
                .x_desc("Average Response Time (ms)")
                .y_desc("Number of Detections")
                .draw()?;

            for point in &self.points {
                let fill = over_white(scan_color(point.scan_type), 0.7);
                let coord = (point.mean_response_ms, point.detections as f64);
                let edge = styles.edge(2.0);

                chart
                    .draw_series([
                        Circle::new(coord, radius, fill.filled()),
                        Circle::new(coord, radius, edge),
                    ])?
                    .label(point.scan_type.label())
                    .legend(move |(x, y)| Circle::new((x, y), radius / 2, fill.filled()));

                // Label sits up and to the right of the marker, offset in pixels.
                let shift = (radius + styles.px(5.0)) as i32;
                chart.draw_series(std::iter::once(
                    EmptyElement::at(coord)
                        + Text::new(point.scan_type.label(), (shift, -shift), styles.annotation(11.0)),
                ))?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .margin(styles.px(8.0))
                .label_font(styles.tick_label())
                .background_style(WHITE.mix(0.8))
                .border_style(GRID)
                .draw()?;
            Ok(())
        })?;

        Ok(path)
    }
}

/// Axis range spanning `values` with 15% slack on each side. A single value
/// gets a window of ±15% of its magnitude (or ±1 at zero).
fn padded(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (low, high) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !low.is_finite() {
        return 0.0..1.0;
    }
    let span = high - low;
    let pad = if span > 0.0 {
        span * 0.15
    } else if high != 0.0 {
        high.abs() * 0.15
    } else {
        1.0
    };
    (low - pad)..(high + pad)
}
