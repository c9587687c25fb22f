pub mod analysis;
pub mod config;
pub mod error;
pub mod intake;
pub mod presentation;

pub use analysis::{analyze_durian, AnalysisResult, DurianRiskAnalyzer, ScreeningService};
pub use crate::config::Settings;
pub use error::{AnalysisError, AppError, IntakeError};
pub use intake::UploadedImage;
pub use presentation::{RiskLevel, ScreeningReport};
