use std::path::PathBuf;

use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Intake Error: {0}")]
    Intake(#[from] IntakeError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to write {1}: {0}")]
    Write(std::io::Error, PathBuf),
    #[error("Failed to encode diagnostic image {1}: {0}")]
    Encode(image::ImageError, PathBuf),
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

// Analysis Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid image: {width}x{height} contains no pixels")]
    InvalidImage { width: u32, height: u32 },
}

// Intake Error Type
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Failed to read {1}: {0}")]
    Read(std::io::Error, PathBuf),
    #[error("File {path} is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("Unsupported image format for {0}: only JPEG and PNG are accepted")]
    UnsupportedFormat(PathBuf),
    #[error("Failed to decode {1}: {0}")]
    Decode(image::ImageError, PathBuf),
}
