use image::{DynamicImage, RgbImage};
use std::sync::Arc;
use std::time::Instant;

use crate::error::AnalysisError;

/// Immutable view of one image as it flows through the heuristics.
#[derive(Clone)]
pub struct AnalysisContext {
    pub rgb: Arc<RgbImage>,
    pub dimensions: (u32, u32),
    pub processing_start: Instant,
}

impl AnalysisContext {
    /// Wrap an already-normalized RGB image. Fails on images without pixels.
    pub fn new(rgb: Arc<RgbImage>) -> Result<Self, AnalysisError> {
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidImage { width, height });
        }

        Ok(Self {
            rgb,
            dimensions: (width, height),
            processing_start: Instant::now(),
        })
    }

    /// Normalizes any decoded image to 8-bit RGB first: gray is expanded,
    /// alpha dropped and 16-bit channels reduced.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, AnalysisError> {
        Self::new(Arc::new(image.to_rgb8()))
    }

    pub fn pixel_count(&self) -> u64 {
        self.dimensions.0 as u64 * self.dimensions.1 as u64
    }
}

/// Outcome of one heuristic, with the representation it was computed on.
#[derive(Debug, Clone)]
pub struct HeuristicOutcome<T> {
    pub fired: bool,
    pub representation: T,
    pub reasoning: String,
    pub processing_time_us: u64,
}

impl<T> HeuristicOutcome<T> {
    pub fn new(fired: bool, representation: T, reasoning: String) -> Self {
        Self {
            fired,
            representation,
            reasoning,
            processing_time_us: 0,
        }
    }

    pub fn with_timing(mut self, start_time: Instant) -> Self {
        self.processing_time_us = start_time.elapsed().as_micros() as u64;
        self
    }
}

/// A binary screening signal derived from one image.
pub trait Heuristic: Send + Sync {
    type Representation;

    fn evaluate(&self, context: &AnalysisContext) -> HeuristicOutcome<Self::Representation>;
    fn name(&self) -> &'static str;
}
