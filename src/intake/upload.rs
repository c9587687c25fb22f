//! Upload boundary: turns a JPEG or PNG file into an 8-bit RGB image ready
//! for analysis.

use image::{DynamicImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::IntakeError;

/// 200 MiB, the upload limit of the original web form.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 200 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub max_file_bytes: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// A decoded upload. The RGB buffer is shared, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub id: Uuid,
    pub source: PathBuf,
    pub format: ImageFormat,
    pub rgb: Arc<RgbImage>,
}

fn accepted(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Jpeg | ImageFormat::Png)
}

impl UploadedImage {
    /// Read, sniff, decode and normalize a file.
    pub fn open(path: &Path, config: &IntakeConfig) -> Result<Self, IntakeError> {
        let metadata =
            std::fs::metadata(path).map_err(|e| IntakeError::Read(e, path.to_path_buf()))?;
        if metadata.len() > config.max_file_bytes {
            warn!(
                path = %path.display(),
                size = metadata.len(),
                limit = config.max_file_bytes,
                "upload rejected: file too large"
            );
            return Err(IntakeError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: config.max_file_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| IntakeError::Read(e, path.to_path_buf()))?;
        Self::from_bytes(&bytes, path)
    }

    /// Decode an in-memory upload. `source` names it in errors and reports,
    /// and its extension is the fallback when the content cannot be sniffed.
    pub fn from_bytes(bytes: &[u8], source: &Path) -> Result<Self, IntakeError> {
        let format = image::guess_format(bytes)
            .ok()
            .or_else(|| ImageFormat::from_path(source).ok())
            .filter(|format| accepted(*format));
        let Some(format) = format else {
            warn!(path = %source.display(), "upload rejected: unsupported format");
            return Err(IntakeError::UnsupportedFormat(source.to_path_buf()));
        };

        let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            warn!(path = %source.display(), error = %e, "upload rejected: decode failed");
            IntakeError::Decode(e, source.to_path_buf())
        })?;

        Ok(Self::from_image(&image, source, format))
    }

    /// Wrap an already decoded image, normalizing it to 8-bit RGB.
    pub fn from_image(image: &DynamicImage, source: &Path, format: ImageFormat) -> Self {
        let rgb = Arc::new(image.to_rgb8());
        let id = Uuid::new_v4();
        debug!(
            %id,
            path = %source.display(),
            ?format,
            color = ?image.color(),
            width = rgb.width(),
            height = rgb.height(),
            "upload decoded"
        );

        Self {
            id,
            source: source.to_path_buf(),
            format,
            rgb,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgb.dimensions()
    }
}
