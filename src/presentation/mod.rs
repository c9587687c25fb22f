//! Display-side concerns layered on top of an [`AnalysisResult`]: risk
//! categories, bilingual labels, rendered reports and diagnostic images.
//! Nothing here feeds back into the analysis.
//!
//! [`AnalysisResult`]: crate::analysis::AnalysisResult

pub mod diagnostics;
pub mod labels;
pub mod report;
pub mod risk;

pub use diagnostics::{DiagnosticImages, DiagnosticPaths};
pub use labels::{Labels, Language};
pub use report::{PresentationConfig, ScreeningReport};
pub use risk::RiskLevel;
