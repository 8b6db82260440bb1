//! Static chart rendering.
//!
//! Every chart is split in two: an aggregation step that turns the loaded
//! datasets into a small plain-data struct, and a render step that draws that
//! struct into an in-memory bitmap and writes it out as PNG. The bitmap is
//! dropped before the next chart starts.

pub mod detection;
pub mod file_paths;
pub mod latency;
pub mod response_time;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::Theme;

pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT_FAMILY: &str = "sans-serif";
const FONT_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const FONT_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Make the embedded fonts available to the text renderer. Safe to call
/// more than once; later calls replace the same entries.
pub fn register_fonts() -> Result<()> {
    for (style, bytes) in [(FontStyle::Normal, FONT_REGULAR), (FontStyle::Bold, FONT_BOLD)] {
        plotters::style::register_font(FONT_FAMILY, style, bytes)
            .map_err(|_| anyhow!("embedded {} font is not a valid TrueType file", style.as_str()))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bitmap lifecycle
// ---------------------------------------------------------------------------

/// Allocate a white canvas of `size` pixels, let `draw` paint it, then encode
/// it as PNG at `path`, replacing any existing file.
pub fn render_png<F>(path: &Path, size: (u32, u32), draw: F) -> Result<()>
where
    F: FnOnce(&Canvas<'_>) -> Result<()>,
{
    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .context("bitmap buffer does not match the requested size")?;
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared text styles
// ---------------------------------------------------------------------------

/// Pixel sizes derived from a [`Theme`].
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub theme: Theme,
}

impl Styles {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn font(&self, points: f64, style: FontStyle) -> TextStyle<'static> {
        TextStyle::from((FONT_FAMILY, self.theme.pt(points), style).into_font())
    }

    pub fn title(&self) -> TextStyle<'static> {
        self.font(self.theme.title_pt, FontStyle::Bold)
    }

    /// Axis descriptions and panel headings.
    pub fn heading(&self) -> TextStyle<'static> {
        self.font(self.theme.axis_desc_pt, FontStyle::Bold)
    }

    pub fn tick_label(&self) -> TextStyle<'static> {
        self.font(self.theme.font_pt, FontStyle::Normal)
    }

    /// Small print used for long category labels.
    pub fn small_label(&self) -> TextStyle<'static> {
        self.font(self.theme.font_pt - 2.0, FontStyle::Normal)
    }

    /// Bold label centred above the point it is drawn at.
    pub fn value_label(&self, points: f64) -> TextStyle<'static> {
        self.font(points, FontStyle::Bold)
            .pos(Pos::new(HPos::Center, VPos::Bottom))
    }

    /// Bold label whose lower-left corner sits at the point it is drawn at.
    pub fn annotation(&self, points: f64) -> TextStyle<'static> {
        self.font(points, FontStyle::Bold)
            .pos(Pos::new(HPos::Left, VPos::Bottom))
    }

    /// Black outline drawn around bars and markers.
    pub fn edge(&self, points: f64) -> ShapeStyle {
        BLACK.stroke_width(self.px(points))
    }

    /// Pixel length for margins, label areas and marker sizes.
    pub fn px(&self, points: f64) -> u32 {
        self.theme.px(points)
    }
}

/// `"123.45ms"` with two decimals, as used on every bar label.
pub fn ms_label(value: f64) -> String {
    format!("{value:.2}ms")
}

/// Category axis with one unit per category, centred on `0, 1, .. n-1`.
pub fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..n as f64 - 0.5
}

/// Tick label on a category axis: the category name at whole positions,
/// nothing in between.
pub fn category_label(labels: &[&str], value: f64) -> String {
    let nearest = value.round();
    if (value - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels
        .get(nearest as usize)
        .map(|l| l.to_string())
        .unwrap_or_default()
}

/// Upper bound of a value axis that leaves room for labels above the tallest bar.
pub fn headroom(top: f64) -> f64 {
    if top > 0.0 {
        top * 1.15
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_at_whole_positions() {
        let labels = ["Shallow", "Deep"];
        assert_eq!(category_label(&labels, 1.0), "Deep");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_range(3), -0.5..2.5);
    }

    #[test]
    fn edges_are_black_and_scale_with_dpi() {
        let styles = Styles::new(Theme::default());
        let edge = styles.edge(1.5);
        assert_eq!(edge.color, BLACK.to_rgba());
        // 1.5pt at 300 dpi
        assert_eq!(edge.stroke_width, 6);
    }
}
