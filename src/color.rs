use palette::{Mix, Srgb};
use plotters::style::RGBColor;

use crate::data::model::ScanType;

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

/// Scan-type colours, indexed by [`ScanType::ordinal`]: green, orange, red.
const SCAN_COLORS: [Srgb<u8>; 3] = [
    Srgb::new(0x2e, 0xcc, 0x71),
    Srgb::new(0xf3, 0x9c, 0x12),
    Srgb::new(0xe7, 0x4c, 0x3c),
];

/// Latency component colours: detection, quarantine, analysis.
pub const COMPONENT_COLORS: [Srgb<u8>; 3] = [
    Srgb::new(0x34, 0x98, 0xdb),
    Srgb::new(0x9b, 0x59, 0xb6),
    Srgb::new(0xe6, 0x7e, 0x22),
];

/// Light grey used for the background grid.
pub const GRID: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);

pub fn scan_color(scan_type: ScanType) -> Srgb<u8> {
    SCAN_COLORS[scan_type.ordinal()]
}

/// Convert to the charting library's colour type.
pub fn to_rgb(color: Srgb<u8>) -> RGBColor {
    RGBColor(color.red, color.green, color.blue)
}

/// Opaque colour that a fill of `color` at `alpha` produces over white paper.
pub fn over_white(color: Srgb<u8>, alpha: f32) -> RGBColor {
    let white = Srgb::new(1.0_f32, 1.0, 1.0);
    let mixed: Srgb<u8> = white.mix(color.into_format::<f32>(), alpha).into_format();
    to_rgb(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_colors_follow_ordinal() {
        assert_eq!(to_rgb(scan_color(ScanType::Shallow)), RGBColor(0x2e, 0xcc, 0x71));
        assert_eq!(to_rgb(scan_color(ScanType::Deep)), RGBColor(0xe7, 0x4c, 0x3c));
    }

    #[test]
    fn alpha_blends_toward_white() {
        let red = Srgb::new(200u8, 0, 0);
        assert_eq!(over_white(red, 1.0), RGBColor(200, 0, 0));
        assert_eq!(over_white(red, 0.0), RGBColor(255, 255, 255));

        let half = over_white(red, 0.5);
        assert_eq!(half.1, 128);
        assert!(half.0 > 200);
    }
}
