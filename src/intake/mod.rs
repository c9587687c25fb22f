pub mod upload;

pub use upload::{IntakeConfig, UploadedImage};
