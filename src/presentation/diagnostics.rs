use image::{imageops, DynamicImage, GrayImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::AnalysisResult;
use crate::error::AppError;

/// Gap between the two panels, in pixels.
const PANEL_GAP: u32 = 8;

/// Visual-inspection renderings of the two intermediate representations.
pub struct DiagnosticImages {
    pub color: RgbImage,
    pub texture: GrayImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticPaths {
    pub color: PathBuf,
    pub texture: PathBuf,
    pub panel: PathBuf,
}

impl DiagnosticImages {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            color: result.color_representation.to_display_rgb(),
            texture: result.texture_representation.to_display_gray(),
        }
    }

    /// Both renderings side by side on a white background.
    pub fn side_by_side(&self) -> RgbImage {
        let (cw, ch) = self.color.dimensions();
        let (tw, th) = self.texture.dimensions();
        let mut panel = RgbImage::from_pixel(cw + PANEL_GAP + tw, ch.max(th), Rgb([255, 255, 255]));

        let texture = DynamicImage::ImageLuma8(self.texture.clone()).to_rgb8();
        imageops::replace(&mut panel, &self.color, 0, 0);
        imageops::replace(&mut panel, &texture, i64::from(cw + PANEL_GAP), 0);
        panel
    }

    /// Write `<stem>_hsv.png`, `<stem>_lbp.png` and `<stem>_panel.png`.
    pub fn write_png(&self, dir: &Path, stem: &str) -> Result<DiagnosticPaths, AppError> {
        std::fs::create_dir_all(dir).map_err(|e| AppError::Write(e, dir.to_path_buf()))?;

        let paths = DiagnosticPaths {
            color: dir.join(format!("{stem}_hsv.png")),
            texture: dir.join(format!("{stem}_lbp.png")),
            panel: dir.join(format!("{stem}_panel.png")),
        };

        self.color
            .save(&paths.color)
            .map_err(|e| AppError::Encode(e, paths.color.clone()))?;
        self.texture
            .save(&paths.texture)
            .map_err(|e| AppError::Encode(e, paths.texture.clone()))?;
        self.side_by_side()
            .save(&paths.panel)
            .map_err(|e| AppError::Encode(e, paths.panel.clone()))?;

        info!(dir = %dir.display(), stem, "diagnostic images written");
        Ok(paths)
    }
}
