pub mod analyzer;
pub mod color;
pub mod config;
pub mod core;
pub mod histogram;
pub mod service;
pub mod texture;

pub use analyzer::{analyze_durian, risk_score, AnalysisResult, DurianRiskAnalyzer};
pub use color::{ColorHeuristic, ColorStats, HsvImage};
pub use self::config::{AnalysisConfig, ColorThresholds, TextureThresholds};
pub use self::core::{AnalysisContext, Heuristic, HeuristicOutcome};
pub use histogram::Histogram;
pub use service::ScreeningService;
pub use texture::{LbpMap, TextureHeuristic};
