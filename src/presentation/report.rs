use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

use super::labels::{Labels, Language};
use super::risk::RiskLevel;
use crate::analysis::AnalysisResult;
use crate::intake::UploadedImage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub language: Language,
    /// Character width of the text progress bar.
    pub progress_width: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            language: Language::Thai,
            progress_width: 20,
        }
    }
}

/// Serializable summary of one screening, ready for a terminal or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub language: Language,
    pub color_flag: bool,
    pub texture_flag: bool,
    pub color_finding: &'static str,
    pub texture_finding: &'static str,
    pub avg_hue: f64,
    pub avg_saturation: f64,
    pub texture_score: f64,
    pub histogram: Vec<u64>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_color: &'static str,
    pub risk_banner: &'static str,
    /// Score with two decimals and a percent sign.
    pub risk_percent: String,
}

impl ScreeningReport {
    pub fn new(upload: &UploadedImage, result: &AnalysisResult, language: Language) -> Self {
        let labels = Labels::for_language(language);
        let risk_level = RiskLevel::from_score(result.risk_score);
        let (width, height) = upload.dimensions();

        Self {
            id: upload.id,
            analyzed_at: Utc::now(),
            source: upload.source.display().to_string(),
            width,
            height,
            language,
            color_flag: result.color_flag,
            texture_flag: result.texture_flag,
            color_finding: labels.color_finding(result.color_flag),
            texture_finding: labels.texture_finding(result.texture_flag),
            avg_hue: result.avg_hue,
            avg_saturation: result.avg_saturation,
            texture_score: result.texture_score,
            histogram: result.histogram.clone(),
            risk_score: result.risk_score,
            risk_level,
            risk_color: risk_level.color_hex(),
            risk_banner: labels.risk_banner(risk_level),
            risk_percent: format!("{:.2}%", result.risk_score),
        }
    }

    pub fn labels(&self) -> &'static Labels {
        Labels::for_language(self.language)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// `[#####---------------] 25%`, scaled to the truncated score.
    pub fn progress_bar(&self, width: usize) -> String {
        let percent = self.risk_score.clamp(0.0, 100.0) as usize;
        let filled = (percent * width + 50) / 100;
        format!(
            "[{}{}] {}%",
            "#".repeat(filled),
            "-".repeat(width - filled),
            percent
        )
    }

    /// Status panels, progress bar, risk banner and the disclaimer.
    pub fn render_text(&self, config: &PresentationConfig) -> String {
        let labels = self.labels();
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "🔍 {}", labels.title);
        let _ = writeln!(out, "📷 {} ({}x{})", self.source, self.width, self.height);
        let _ = writeln!(out);
        let _ = writeln!(out, "🔬 {}", labels.results_heading);
        let _ = writeln!(out, "  🚨 {} : {}", labels.color_panel, self.color_finding);
        let _ = writeln!(out, "  🔍 {} : {}", labels.texture_panel, self.texture_finding);
        let _ = writeln!(
            out,
            "     H={:.2} S={:.2} LBP var={:.2}",
            self.avg_hue, self.avg_saturation, self.texture_score
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "🚨 {}", labels.risk_heading);
        let _ = writeln!(out, "  {}", self.progress_bar(config.progress_width));
        let _ = writeln!(
            out,
            "  {} {} : {}",
            self.risk_level.icon(),
            self.risk_banner,
            self.risk_percent
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "⚠️ {}:", labels.disclaimer_heading);
        for line in labels.disclaimer {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

/// The photo-capture guidance shown next to the upload form.
pub fn render_guide(language: Language) -> String {
    let labels = Labels::for_language(language);
    let mut out = format!("ℹ️ {}\n", labels.guide_heading);
    for line in labels.guide {
        out.push_str("  - ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
