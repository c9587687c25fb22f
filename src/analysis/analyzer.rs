use image::{DynamicImage, RgbImage};
use std::sync::Arc;
use tracing::{debug, info};

use super::color::{ColorHeuristic, HsvImage};
use super::config::AnalysisConfig;
use super::core::{AnalysisContext, Heuristic};
use super::texture::{LbpMap, TextureHeuristic};
use crate::error::AnalysisError;

/// Everything one analysis pass produces. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub color_flag: bool,
    pub texture_flag: bool,
    /// Always 0, 50 or 100.
    pub risk_score: f64,
    /// For display only.
    pub color_representation: HsvImage,
    /// For display only.
    pub texture_representation: LbpMap,
    pub avg_hue: f64,
    pub avg_saturation: f64,
    pub texture_score: f64,
    pub histogram: Vec<u64>,
}

/// Mean of the two binary flags, as a percentage.
pub fn risk_score(color_flag: bool, texture_flag: bool) -> f64 {
    (u8::from(color_flag) + u8::from(texture_flag)) as f64 / 2.0 * 100.0
}

/// Stateless screening analyzer combining the color and texture heuristics.
///
/// Identical pixel data always yields an identical result, and a single
/// analyzer can be shared across threads.
pub struct DurianRiskAnalyzer {
    color: ColorHeuristic,
    texture: TextureHeuristic,
}

impl DurianRiskAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            color: ColorHeuristic::new(config.color_thresholds),
            texture: TextureHeuristic::new(config.texture_thresholds),
        }
    }

    pub fn analyze(&self, rgb: Arc<RgbImage>) -> Result<AnalysisResult, AnalysisError> {
        let context = AnalysisContext::new(rgb)?;
        Ok(self.analyze_context(&context))
    }

    /// Accepts any decoded image and normalizes it to 8-bit RGB first.
    pub fn analyze_dynamic(&self, image: &DynamicImage) -> Result<AnalysisResult, AnalysisError> {
        let context = AnalysisContext::from_dynamic(image)?;
        Ok(self.analyze_context(&context))
    }

    pub fn analyze_context(&self, context: &AnalysisContext) -> AnalysisResult {
        let color = self.color.evaluate(context);
        let texture = self.texture.evaluate(context);
        debug!(
            "{}: {} in {}us; {}: {} in {}us",
            self.color.name(),
            color.reasoning,
            color.processing_time_us,
            self.texture.name(),
            texture.reasoning,
            texture.processing_time_us
        );

        let score = risk_score(color.fired, texture.fired);
        info!(
            width = context.dimensions.0,
            height = context.dimensions.1,
            color_flag = color.fired,
            texture_flag = texture.fired,
            risk_score = score,
            elapsed_us = context.processing_start.elapsed().as_micros() as u64,
            "durian analysis complete"
        );

        let texture_repr = texture.representation;
        AnalysisResult {
            color_flag: color.fired,
            texture_flag: texture.fired,
            risk_score: score,
            avg_hue: color.representation.stats.avg_hue,
            avg_saturation: color.representation.stats.avg_saturation,
            color_representation: color.representation.hsv,
            texture_score: texture_repr.texture_score,
            histogram: texture_repr.histogram.counts().to_vec(),
            texture_representation: texture_repr.lbp,
        }
    }
}

impl Default for DurianRiskAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// One-shot analysis with the default screening constants.
pub fn analyze_durian(image: &DynamicImage) -> Result<AnalysisResult, AnalysisError> {
    DurianRiskAnalyzer::default().analyze_dynamic(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Arc<RgbImage> {
        Arc::new(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// Deterministic pseudo-random RGB noise.
    fn noise(width: u32, height: u32, seed: u32) -> Arc<RgbImage> {
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            ((state >> 16) & 0xff) as u8
        };
        let mut rgb = RgbImage::new(width, height);
        for pixel in rgb.pixels_mut() {
            *pixel = Rgb([next(), next(), next()]);
        }
        Arc::new(rgb)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn risk_score_is_mean_of_flags() {
        assert_eq!(risk_score(false, false), 0.0);
        assert_eq!(risk_score(true, false), 50.0);
        assert_eq!(risk_score(false, true), 50.0);
        assert_eq!(risk_score(true, true), 100.0);
    }

    #[test]
    fn saturated_yellow_fires_color_only() {
        let result = DurianRiskAnalyzer::default()
            .analyze(solid(32, 32, [230, 210, 50]))
            .expect("valid image");
        assert!(result.color_flag);
        assert!(!result.texture_flag);
        assert_eq!(result.risk_score, 50.0);
        assert_eq!(result.avg_hue, 27.0);
        assert_eq!(result.avg_saturation, 200.0);
        assert_eq!(result.histogram, vec![4, 0, 0, 0, 120, 0, 0, 0, 0, 900]);
        assert!(approx_eq(result.texture_score, 71955.84));
        assert_eq!(result.color_representation.dimensions(), (32, 32));
        assert_eq!(result.texture_representation.dimensions(), (32, 32));
    }

    #[test]
    fn solid_blue_is_low_risk() {
        let result = DurianRiskAnalyzer::default()
            .analyze(solid(32, 32, [0, 0, 255]))
            .expect("valid image");
        assert!(!result.color_flag);
        assert!(!result.texture_flag);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.avg_hue, 120.0);
    }

    #[test]
    fn uniform_black_and_white_do_not_false_positive() {
        // A flat surface piles the labels into few bins: variance is high,
        // so the "abnormally smooth" flag stays off for the smoothest input.
        let analyzer = DurianRiskAnalyzer::default();

        let black = analyzer.analyze(solid(32, 32, [0, 0, 0])).expect("valid image");
        assert!(!black.texture_flag);
        assert_eq!(black.histogram, vec![0, 0, 0, 0, 0, 1024, 0, 0, 0, 0]);
        assert!(approx_eq(black.texture_score, 94371.84));

        let white = analyzer
            .analyze(solid(32, 32, [255, 255, 255]))
            .expect("valid image");
        assert!(!white.texture_flag);
        assert!(approx_eq(white.texture_score, 71955.84));
        assert_eq!(white.risk_score, 0.0);
    }

    #[test]
    fn evenly_spread_noise_fires_texture() {
        let result = DurianRiskAnalyzer::default()
            .analyze(noise(16, 16, 42))
            .expect("valid image");
        assert_eq!(result.histogram, vec![46, 34, 22, 4, 5, 18, 8, 23, 37, 59]);
        assert!(approx_eq(result.texture_score, 301.04));
        assert!(result.texture_flag);
        assert!(!result.color_flag);
        assert_eq!(result.risk_score, 50.0);
    }

    #[test]
    fn larger_noise_is_not_uniform_enough() {
        let result = DurianRiskAnalyzer::default()
            .analyze(noise(32, 32, 42))
            .expect("valid image");
        assert!(approx_eq(result.texture_score, 5417.84));
        assert!(!result.texture_flag);
    }

    #[test]
    fn tiny_yellow_image_is_high_risk() {
        let result = DurianRiskAnalyzer::default()
            .analyze(solid(3, 3, [230, 210, 50]))
            .expect("valid image");
        assert_eq!(result.histogram, vec![4, 0, 0, 0, 4, 0, 0, 0, 0, 1]);
        assert!(approx_eq(result.texture_score, 2.49));
        assert_eq!(result.risk_score, 100.0);
    }

    #[test]
    fn single_pixel_has_defined_result() {
        let result = DurianRiskAnalyzer::default()
            .analyze(solid(1, 1, [10, 20, 30]))
            .expect("1x1 is valid");
        assert!(approx_eq(result.texture_score, 0.09));
        assert!(result.texture_flag);
        assert_eq!(result.histogram.iter().sum::<u64>(), 1);
    }

    #[test]
    fn empty_image_is_invalid() {
        let err = DurianRiskAnalyzer::default()
            .analyze(solid(0, 0, [0, 0, 0]))
            .expect_err("no pixels");
        assert_eq!(
            err,
            AnalysisError::InvalidImage {
                width: 0,
                height: 0
            }
        );
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let analyzer = DurianRiskAnalyzer::default();
        let image = noise(24, 24, 7);
        let first = analyzer.analyze(Arc::clone(&image)).expect("valid image");
        let second = analyzer.analyze(image).expect("valid image");
        assert_eq!(first.risk_score.to_bits(), second.risk_score.to_bits());
        assert_eq!(first.color_flag, second.color_flag);
        assert_eq!(first.texture_flag, second.texture_flag);
        assert_eq!(first.histogram, second.histogram);
        assert_eq!(first.texture_representation, second.texture_representation);
    }

    #[test]
    fn risk_score_is_always_a_half_step() {
        let analyzer = DurianRiskAnalyzer::default();
        let images = [
            solid(1, 1, [0, 0, 0]),
            solid(2, 7, [230, 210, 50]),
            solid(9, 4, [12, 200, 40]),
            noise(5, 11, 1),
            noise(20, 13, 99),
        ];
        for image in images {
            let result = analyzer.analyze(image).expect("valid image");
            assert!([0.0, 50.0, 100.0].contains(&result.risk_score));
        }
    }

    #[test]
    fn grayscale_sources_are_expanded() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([0])));
        let result = analyze_durian(&gray).expect("valid image");
        assert_eq!(result.histogram[5], 16);
        assert_eq!(result.avg_saturation, 0.0);
    }

    #[test]
    fn thresholds_come_from_config() {
        let config = AnalysisConfig::default().with_hue_band(100.0, 130.0);
        let result = DurianRiskAnalyzer::new(config)
            .analyze(solid(32, 32, [0, 0, 255]))
            .expect("valid image");
        assert!(result.color_flag);

        let config = AnalysisConfig::default().with_variance_max(100_000.0);
        let result = DurianRiskAnalyzer::new(config)
            .analyze(solid(32, 32, [0, 0, 0]))
            .expect("valid image");
        assert!(result.texture_flag);
    }
}
