use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

use crate::analysis::AnalysisConfig;
use crate::error::AppError;
use crate::intake::IntakeConfig;
use crate::presentation::PresentationConfig;

/// Looked up in the working directory when no file is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "durian-screen";
pub const ENV_PREFIX: &str = "DURIAN_SCREEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisConfig,
    pub intake: IntakeConfig,
    pub presentation: PresentationConfig,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            intake: IntakeConfig::default(),
            presentation: PresentationConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then `DURIAN_SCREEN__*` variables.
    ///
    /// An explicit `path` must exist; the default `durian-screen.{toml,json,yaml}`
    /// is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.analysis.validate().map_err(AppError::InvalidConfig)?;
        if self.intake.max_file_bytes == 0 {
            return Err(AppError::InvalidConfig(
                "Maximum upload size must be greater than 0".to_string(),
            ));
        }
        if self.presentation.progress_width == 0 {
            return Err(AppError::InvalidConfig(
                "Progress bar width must be greater than 0".to_string(),
            ));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level, AppError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| AppError::InvalidConfig(format!("Unknown log level: {}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Language;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Loading reads the process environment, which the override test mutates.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.level().expect("valid level"), Level::INFO);
        assert_eq!(settings.presentation.language, Language::Thai);
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let _env = env_guard();
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("screen.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            "log_level = \"debug\"\n\n[analysis.color_thresholds]\nsaturation_min = 100.0\n\n[presentation]\nlanguage = \"en\""
        )
        .expect("write");

        let settings = Settings::load(Some(&path)).expect("loads");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.analysis.color_thresholds.saturation_min, 100.0);
        assert_eq!(settings.analysis.color_thresholds.hue_min, 20.0);
        assert_eq!(settings.analysis.texture_thresholds.variance_max, 500.0);
        assert_eq!(settings.presentation.language, Language::English);
        assert_eq!(settings.presentation.progress_width, 20);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let _env = env_guard();
        let dir = tempdir().expect("temp dir");
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).expect_err("missing");
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let _env = env_guard();
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis.color_thresholds]\nhue_min = 40.0\n").expect("write");
        let err = Settings::load(Some(&path)).expect_err("inverted band");
        assert!(matches!(err, AppError::InvalidConfig(_)));

        let settings = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn environment_overrides_defaults() {
        let _env = env_guard();
        let vars = [
            ("DURIAN_SCREEN__ANALYSIS__COLOR_THRESHOLDS__HUE_MIN", "22.5"),
            ("DURIAN_SCREEN__INTAKE__MAX_FILE_BYTES", "1024"),
            ("DURIAN_SCREEN__PRESENTATION__LANGUAGE", "en"),
            ("DURIAN_SCREEN__LOG_LEVEL", "debug"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let loaded = Settings::load(None);
        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let settings = loaded.expect("loads from environment");
        assert_eq!(settings.analysis.color_thresholds.hue_min, 22.5);
        assert_eq!(settings.analysis.color_thresholds.hue_max, 35.0);
        assert_eq!(settings.intake.max_file_bytes, 1024);
        assert_eq!(settings.presentation.language, Language::English);
        assert_eq!(settings.level().expect("valid level"), Level::DEBUG);
    }
}
