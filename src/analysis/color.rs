//! Hue/saturation/value conversion and the abnormal-yellow color heuristic.
//!
//! Conversion uses 8-bit conventions: hue in half-degree units (0..180),
//! saturation and value in 0..255. The arithmetic is 12-bit fixed point so
//! the averages match what common vision libraries report for the same
//! pixels.

use image::{Rgb, RgbImage};
use std::time::Instant;
use tracing::debug;

use super::config::ColorThresholds;
use super::core::{AnalysisContext, Heuristic, HeuristicOutcome};

const HSV_SHIFT: u32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);
const HUE_RANGE: i32 = 180;

/// An image re-expressed in HSV. Channel 0 is hue, 1 saturation, 2 value.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvImage {
    buffer: RgbImage,
}

/// Channel means over every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStats {
    pub avg_hue: f64,
    pub avg_saturation: f64,
}

fn saturation_divisor(value: i32) -> i32 {
    if value == 0 {
        0
    } else {
        ((255 << HSV_SHIFT) as f64 / value as f64).round_ties_even() as i32
    }
}

fn hue_divisor(diff: i32) -> i32 {
    if diff == 0 {
        0
    } else {
        ((HUE_RANGE << HSV_SHIFT) as f64 / (6.0 * diff as f64)).round_ties_even() as i32
    }
}

/// Convert one 8-bit RGB pixel to `[hue, saturation, value]`.
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0.map(i32::from);
    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);

    let s = (diff * saturation_divisor(v) + HSV_ROUND) >> HSV_SHIFT;

    // Red wins ties over green, green over blue.
    let numerator = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (numerator * hue_divisor(diff) + HSV_ROUND) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    [h as u8, s as u8, v as u8]
}

/// Inverse conversion, used only to render the HSV representation.
pub fn hsv_to_rgb(pixel: [u8; 3]) -> Rgb<u8> {
    let v = pixel[2] as f32 / 255.0;
    let s = pixel[1] as f32 / 255.0;
    if s == 0.0 {
        let c = (v * 255.0).round_ties_even() as u8;
        return Rgb([c, c, c]);
    }

    let mut h = pixel[0] as f32 * (6.0 / HUE_RANGE as f32);
    while h >= 6.0 {
        h -= 6.0;
    }
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let to_u8 = |c: f32| (c * 255.0).round_ties_even().clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

impl HsvImage {
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let mut buffer = RgbImage::new(rgb.width(), rgb.height());
        for (src, dst) in rgb.pixels().zip(buffer.pixels_mut()) {
            *dst = Rgb(rgb_to_hsv(*src));
        }
        Self { buffer }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// `[hue, saturation, value]` at the given position.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.buffer.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn hue(&self) -> impl Iterator<Item = u8> + '_ {
        self.buffer.pixels().map(|p| p[0])
    }

    pub fn saturation(&self) -> impl Iterator<Item = u8> + '_ {
        self.buffer.pixels().map(|p| p[1])
    }

    pub fn value(&self) -> impl Iterator<Item = u8> + '_ {
        self.buffer.pixels().map(|p| p[2])
    }

    /// Means of the hue and saturation channels. Zero for an empty image.
    pub fn stats(&self) -> ColorStats {
        let (width, height) = self.buffer.dimensions();
        let count = width as u64 * height as u64;
        if count == 0 {
            return ColorStats {
                avg_hue: 0.0,
                avg_saturation: 0.0,
            };
        }

        let (hue_sum, saturation_sum) = self
            .buffer
            .pixels()
            .fold((0u64, 0u64), |(h, s), p| (h + u64::from(p[0]), s + u64::from(p[1])));

        ColorStats {
            avg_hue: hue_sum as f64 / count as f64,
            avg_saturation: saturation_sum as f64 / count as f64,
        }
    }

    /// Back to RGB for display.
    pub fn to_display_rgb(&self) -> RgbImage {
        let mut out = RgbImage::new(self.buffer.width(), self.buffer.height());
        for (src, dst) in self.buffer.pixels().zip(out.pixels_mut()) {
            *dst = hsv_to_rgb(src.0);
        }
        out
    }
}

/// Representation produced by [`ColorHeuristic`].
#[derive(Debug, Clone)]
pub struct ColorRepresentation {
    pub hsv: HsvImage,
    pub stats: ColorStats,
}

/// Fires when the average hue sits in the abnormal yellow band and the
/// average saturation is high.
pub struct ColorHeuristic {
    thresholds: ColorThresholds,
}

impl ColorHeuristic {
    pub fn new(thresholds: ColorThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for ColorHeuristic {
    fn default() -> Self {
        Self::new(ColorThresholds::default())
    }
}

impl Heuristic for ColorHeuristic {
    type Representation = ColorRepresentation;

    fn evaluate(&self, context: &AnalysisContext) -> HeuristicOutcome<ColorRepresentation> {
        let start_time = Instant::now();
        let hsv = HsvImage::from_rgb(&context.rgb);
        let stats = hsv.stats();
        let fired = self.thresholds.matches(stats.avg_hue, stats.avg_saturation);

        debug!(
            avg_hue = stats.avg_hue,
            avg_saturation = stats.avg_saturation,
            fired,
            "color heuristic evaluated"
        );

        HeuristicOutcome::new(
            fired,
            ColorRepresentation { hsv, stats },
            format!(
                "average hue {:.2} (band {}..{}), average saturation {:.2} (min {})",
                stats.avg_hue,
                self.thresholds.hue_min,
                self.thresholds.hue_max,
                stats.avg_saturation,
                self.thresholds.saturation_min
            ),
        )
        .with_timing(start_time)
    }

    fn name(&self) -> &'static str {
        "ColorHeuristic"
    }
}
