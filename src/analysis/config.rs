use serde::{Deserialize, Serialize};

/// Largest ring supported by the descriptor; labels must fit in a byte.
pub const MAX_RING_POINTS: u32 = 32;

/// Decision constants and descriptor geometry for the risk analysis.
///
/// The defaults are empirical and uncalibrated. They reproduce the screening
/// tool's behaviour exactly and should only change alongside new ground truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub color_thresholds: ColorThresholds,
    pub texture_thresholds: TextureThresholds,
}

/// Hue is on the 0..180 scale, saturation on 0..255.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorThresholds {
    /// Exclusive lower bound of the abnormal hue band.
    pub hue_min: f64,
    /// Exclusive upper bound of the abnormal hue band.
    pub hue_max: f64,
    /// Average saturation must be strictly above this.
    pub saturation_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureThresholds {
    /// Number of samples on the ring around each pixel.
    pub points: u32,
    /// Ring radius in pixels.
    pub radius: f64,
    /// Number of equal-width histogram bins over the label range.
    pub bins: usize,
    /// Bin-count variance must be strictly below this for the flag to fire.
    pub variance_max: f64,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            hue_min: 20.0,
            hue_max: 35.0,
            saturation_min: 120.0,
        }
    }
}

impl Default for TextureThresholds {
    fn default() -> Self {
        Self {
            points: 8,
            radius: 1.0,
            bins: 10,
            variance_max: 500.0,
        }
    }
}

impl ColorThresholds {
    /// Strict comparisons on every bound.
    pub fn matches(&self, avg_hue: f64, avg_saturation: f64) -> bool {
        self.hue_min < avg_hue && avg_hue < self.hue_max && avg_saturation > self.saturation_min
    }
}

impl AnalysisConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        let color = &self.color_thresholds;
        if color.hue_min >= color.hue_max {
            return Err(format!(
                "Hue band must be non-empty, got ({}, {})",
                color.hue_min, color.hue_max
            ));
        }

        if !(0.0..=180.0).contains(&color.hue_min) || !(0.0..=180.0).contains(&color.hue_max) {
            return Err("Hue bounds must be between 0 and 180".to_string());
        }

        if !color.saturation_min.is_finite() {
            return Err(format!(
                "Saturation threshold must be finite, got {}",
                color.saturation_min
            ));
        }

        let texture = &self.texture_thresholds;
        if texture.bins == 0 {
            return Err("Histogram must have at least one bin".to_string());
        }

        if texture.points == 0 || texture.points > MAX_RING_POINTS {
            return Err(format!(
                "Sample point count must be between 1 and {MAX_RING_POINTS}, got {}",
                texture.points
            ));
        }

        if !texture.radius.is_finite() || texture.radius <= 0.0 {
            return Err(format!(
                "Sample radius must be positive, got {}",
                texture.radius
            ));
        }

        if !texture.variance_max.is_finite() {
            return Err(format!(
                "Variance threshold must be finite, got {}",
                texture.variance_max
            ));
        }

        Ok(())
    }

    /// Set the abnormal hue band (exclusive on both ends)
    pub fn with_hue_band(mut self, min: f64, max: f64) -> Self {
        self.color_thresholds.hue_min = min;
        self.color_thresholds.hue_max = max;
        self
    }

    /// Set the minimum average saturation
    pub fn with_saturation_min(mut self, saturation: f64) -> Self {
        self.color_thresholds.saturation_min = saturation;
        self
    }

    /// Set the texture variance threshold
    pub fn with_variance_max(mut self, variance: f64) -> Self {
        self.texture_thresholds.variance_max = variance;
        self
    }

    /// Set the descriptor ring geometry
    pub fn with_ring(mut self, points: u32, radius: f64) -> Self {
        self.texture_thresholds.points = points;
        self.texture_thresholds.radius = radius;
        self
    }
}
