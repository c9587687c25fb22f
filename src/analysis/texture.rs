//! Luminance conversion, rotation-invariant uniform local binary patterns
//! and the texture-uniformity heuristic built on their histogram.

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::f64::consts::PI;
use std::time::Instant;
use tracing::debug;

use super::config::{TextureThresholds, MAX_RING_POINTS};
use super::core::{AnalysisContext, Heuristic, HeuristicOutcome};
use super::histogram::Histogram;

const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

/// BT.601 luminance in 14-bit fixed point.
pub fn luminance(pixel: Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0.map(u32::from);
    ((b * LUMA_B + g * LUMA_G + r * LUMA_R + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

pub fn to_grayscale(rgb: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (src, dst) in rgb.pixels().zip(gray.pixels_mut()) {
        *dst = Luma([luminance(*src)]);
    }
    gray
}

/// Per-pixel uniform LBP labels in `0..=points + 1`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct LbpMap {
    width: u32,
    height: u32,
    points: u32,
    labels: Vec<u8>,
}

/// Offsets of the sampling ring, rounded to five decimals so that samples
/// on the axes fall exactly on pixel centers.
fn ring_offsets(points: u32, radius: f64) -> Vec<(f64, f64)> {
    let round5 = |v: f64| (v * 1e5).round_ties_even() / 1e5;
    (0..points)
        .map(|p| {
            let angle = 2.0 * PI * p as f64 / points as f64;
            (round5(-radius * angle.sin()), round5(radius * angle.cos()))
        })
        .collect()
}

/// Zero outside the image.
fn sample(grid: &[f64], width: usize, height: usize, row: i64, col: i64) -> f64 {
    if row < 0 || col < 0 || row >= height as i64 || col >= width as i64 {
        0.0
    } else {
        grid[row as usize * width + col as usize]
    }
}

fn bilinear(grid: &[f64], width: usize, height: usize, r: f64, c: f64) -> f64 {
    let min_r = r.floor();
    let min_c = c.floor();
    let max_r = r.ceil() as i64;
    let max_c = c.ceil() as i64;
    let dr = r - min_r;
    let dc = c - min_c;
    let (min_r, min_c) = (min_r as i64, min_c as i64);

    let top_left = sample(grid, width, height, min_r, min_c);
    let top_right = sample(grid, width, height, min_r, max_c);
    let bottom_left = sample(grid, width, height, max_r, min_c);
    let bottom_right = sample(grid, width, height, max_r, max_c);

    let top = (1.0 - dc) * top_left + dc * top_right;
    let bottom = (1.0 - dc) * bottom_left + dc * bottom_right;
    (1.0 - dr) * top + dr * bottom
}

fn non_uniform_label(points: u32) -> u8 {
    u8::try_from(points + 1).unwrap_or(u8::MAX)
}

impl LbpMap {
    /// Compute the descriptor over a grayscale image.
    ///
    /// Bit `p` is set when the interpolated sample is at least the center
    /// value. Transitions are counted along the `points - 1` consecutive
    /// pairs of the ring without wrapping; patterns with at most two
    /// transitions are labelled by their bit count, all others share
    /// `points + 1`. `points` is clamped to `1..=MAX_RING_POINTS`.
    pub fn compute(gray: &GrayImage, points: u32, radius: f64) -> Self {
        let points = points.clamp(1, MAX_RING_POINTS);
        let (width, height) = gray.dimensions();
        let (w, h) = (width as usize, height as usize);
        let grid: Vec<f64> = gray.pixels().map(|p| f64::from(p[0])).collect();
        let offsets = ring_offsets(points, radius);

        let mut bits = vec![false; points as usize];
        let mut labels = Vec::with_capacity(w * h);
        for row in 0..h {
            for col in 0..w {
                let center = grid[row * w + col];
                for (bit, &(dr, dc)) in bits.iter_mut().zip(&offsets) {
                    let value = bilinear(&grid, w, h, row as f64 + dr, col as f64 + dc);
                    *bit = value - center >= 0.0;
                }

                let transitions = bits.windows(2).filter(|pair| pair[0] != pair[1]).count();
                let label = if transitions <= 2 {
                    bits.iter().filter(|&&b| b).count() as u8
                } else {
                    non_uniform_label(points)
                };
                labels.push(label);
            }
        }

        Self {
            width,
            height,
            points,
            labels,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// The label shared by every non-uniform pattern.
    pub fn non_uniform_label(&self) -> u8 {
        non_uniform_label(self.points)
    }

    pub fn histogram(&self, bins: usize) -> Histogram {
        let values: Vec<f64> = self.labels.iter().map(|&l| f64::from(l)).collect();
        Histogram::uniform(&values, bins)
    }

    /// Labels stretched from their observed range to 0..=255 for display.
    pub fn to_display_gray(&self) -> GrayImage {
        let lo = self.labels.iter().copied().min().unwrap_or(0);
        let hi = self.labels.iter().copied().max().unwrap_or(0);
        let span = f32::from(hi - lo);

        let mut out = GrayImage::new(self.width, self.height);
        for (dst, &label) in out.pixels_mut().zip(&self.labels) {
            let level = if span == 0.0 {
                0.0
            } else {
                f32::from(label - lo) / span * 255.0
            };
            *dst = Luma([level.round() as u8]);
        }
        out
    }
}

/// Representation produced by [`TextureHeuristic`].
#[derive(Debug, Clone)]
pub struct TextureRepresentation {
    pub lbp: LbpMap,
    pub histogram: Histogram,
    pub texture_score: f64,
}

/// Fires when the descriptor histogram is unusually flat across its bins.
///
/// A perfectly uniform surface concentrates nearly every pixel in two or three
/// labels, which gives a high bin variance and therefore does NOT fire. Low
/// variance comes from labels spread evenly across the bins.
pub struct TextureHeuristic {
    thresholds: TextureThresholds,
}

impl TextureHeuristic {
    pub fn new(thresholds: TextureThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for TextureHeuristic {
    fn default() -> Self {
        Self::new(TextureThresholds::default())
    }
}

impl Heuristic for TextureHeuristic {
    type Representation = TextureRepresentation;

    fn evaluate(&self, context: &AnalysisContext) -> HeuristicOutcome<TextureRepresentation> {
        let start_time = Instant::now();
        let gray = to_grayscale(&context.rgb);
        let lbp = LbpMap::compute(&gray, self.thresholds.points, self.thresholds.radius);
        let histogram = lbp.histogram(self.thresholds.bins);
        let texture_score = histogram.count_variance();
        let fired = texture_score < self.thresholds.variance_max;

        debug!(
            texture_score,
            counts = ?histogram.counts(),
            fired,
            "texture heuristic evaluated"
        );

        let reasoning = format!(
            "bin-count variance {:.2} (max {})",
            texture_score, self.thresholds.variance_max
        );
        HeuristicOutcome::new(
            fired,
            TextureRepresentation {
                lbp,
                histogram,
                texture_score,
            },
            reasoning,
        )
        .with_timing(start_time)
    }

    fn name(&self) -> &'static str {
        "TextureHeuristic"
    }
}
