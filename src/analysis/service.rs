use futures::future::{ready, Ready};
use image::{DynamicImage, RgbImage};
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

use super::analyzer::{AnalysisResult, DurianRiskAnalyzer};
use crate::error::AppError;

/// Tower adapter around [`DurianRiskAnalyzer`]. Always ready; each call
/// resolves immediately since the analysis is synchronous.
#[derive(Clone)]
pub struct ScreeningService {
    analyzer: Arc<DurianRiskAnalyzer>,
}

impl ScreeningService {
    pub fn new(analyzer: DurianRiskAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

impl Default for ScreeningService {
    fn default() -> Self {
        Self::new(DurianRiskAnalyzer::default())
    }
}

impl Service<DynamicImage> for ScreeningService {
    type Response = AnalysisResult;
    type Error = AppError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), AppError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, image: DynamicImage) -> Self::Future {
        ready(self.analyzer.analyze_dynamic(&image).map_err(AppError::from))
    }
}

impl Service<Arc<RgbImage>> for ScreeningService {
    type Response = AnalysisResult;
    type Error = AppError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), AppError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, rgb: Arc<RgbImage>) -> Self::Future {
        ready(self.analyzer.analyze(rgb).map_err(AppError::from))
    }
}
