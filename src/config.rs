use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Level;

use crate::analysis::{DEFAULT_WHITISH_THRESHOLD, EdgePolicy, Whitish};
use crate::error::AppError;

pub const SETTINGS_FILE: &str = "color_picker";
pub const ENV_PREFIX: &str = "COLOR_PICKER";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub whitish_threshold: u8,
    /// Half-width of the averaging window used on click.
    pub average_inset: u32,
    pub edge_policy: EdgePolicy,
    pub analysis_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    pub canvas_size: f32,
    pub preserve_aspect: bool,
    pub window_width: f32,
    pub window_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            whitish_threshold: DEFAULT_WHITISH_THRESHOLD,
            average_inset: 20,
            edge_policy: EdgePolicy::Clip,
            analysis_timeout_ms: None,
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            canvas_size: 500.0,
            preserve_aspect: true,
            window_width: 1100.0,
            window_height: 720.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `color_picker.{toml,json,yaml}` if present, then
    /// `COLOR_PICKER__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(
            Config::builder()
                .add_source(File::with_name(SETTINGS_FILE).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn load_from(
        overrides: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(overrides.build()?)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.ui.canvas_size.is_nan() || self.ui.canvas_size <= 0.0 {
            return Err(AppError::InvalidSettings(
                "Canvas size must be greater than 0".to_string(),
            ));
        }

        if self.analysis.analysis_timeout_ms == Some(0) {
            return Err(AppError::InvalidSettings(
                "Analysis timeout must be greater than 0 when set".to_string(),
            ));
        }

        self.logging.max_level()?;
        Ok(())
    }
}

impl AnalysisSettings {
    pub fn exclusion(&self) -> Whitish {
        Whitish::new(self.whitish_threshold)
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_ms.map(Duration::from_millis)
    }
}

impl LoggingSettings {
    pub fn max_level(&self) -> Result<Level, AppError> {
        self.level
            .parse::<Level>()
            .map_err(|_| AppError::InvalidSettings(format!("Unknown log level '{}'", self.level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_toml(toml: &str) -> Result<Settings, AppError> {
        Settings::load_from(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_match_picker_behaviour() {
        let settings = Settings::default();
        assert_eq!(settings.analysis.whitish_threshold, 200);
        assert_eq!(settings.analysis.average_inset, 20);
        assert_eq!(settings.analysis.edge_policy, EdgePolicy::Clip);
        assert_eq!(settings.ui.canvas_size, 500.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn empty_sources_yield_defaults() {
        assert_eq!(load_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn file_overrides_single_keys() {
        let settings = load_toml(
            r#"
            [analysis]
            average_inset = 3
            edge_policy = "reject"
            analysis_timeout_ms = 250

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(settings.analysis.average_inset, 3);
        assert_eq!(settings.analysis.edge_policy, EdgePolicy::Reject);
        assert_eq!(settings.analysis.analysis_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(settings.analysis.whitish_threshold, 200);
        assert_eq!(settings.logging.max_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = load_toml("[logging]\nlevel = \"chatty\"").unwrap_err();
        assert!(matches!(err, AppError::InvalidSettings(_)));
    }

    #[test]
    fn rejects_zero_canvas() {
        let err = load_toml("[ui]\ncanvas_size = 0.0").unwrap_err();
        assert!(matches!(err, AppError::InvalidSettings(_)));
    }

    #[test]
    fn exclusion_uses_configured_threshold() {
        let mut settings = AnalysisSettings::default();
        settings.whitish_threshold = 100;
        assert_eq!(settings.exclusion(), Whitish::new(100));
    }
}
