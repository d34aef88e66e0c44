//! Studio configuration, loaded from TOML.
//!
//! ```toml
//! workspace_padding = 64.0
//!
//! [export]
//! settle_delay_ms = 300
//! file_prefix = "AE"
//! ```
//!
//! Every field is optional. Capture parameters are not configurable: every
//! export is captured with [`CaptureConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::CaptureConfig;
use crate::error::StudioError;
use crate::export::DEFAULT_FILE_PREFIX;
use crate::interaction::DEFAULT_WORKSPACE_PADDING;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Subtracted from both workspace axes before fitting the canvas.
    pub workspace_padding: f32,
    pub export: ExportConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self { workspace_padding: DEFAULT_WORKSPACE_PADDING, export: ExportConfig::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Pause between building the export scene and capturing it.
    pub settle_delay_ms: u64,
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { settle_delay_ms: 300, file_prefix: DEFAULT_FILE_PREFIX.to_string() }
    }
}

impl ExportConfig {
    #[inline]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Capture parameters: always 700x500 at scale 1 with a transparent background.
    #[inline]
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig::default()
    }
}

impl StudioConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, StudioError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| StudioError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&text)
            .map_err(|source| StudioError::Config { path: path.to_path_buf(), source })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = StudioConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, StudioConfig::default());
        assert_eq!(cfg.workspace_padding, 64.0);
        assert_eq!(cfg.export.settle_delay(), Duration::from_millis(300));
        assert_eq!(cfg.export.file_prefix, "AE");
        assert_eq!(cfg.export.capture_config(), CaptureConfig::default());
    }

    #[test]
    fn partial_export_section_keeps_other_defaults() {
        let cfg = StudioConfig::from_toml_str(
            r#"
            [export]
            settle_delay_ms = 0
            file_prefix = "PR"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.export.settle_delay_ms, 0);
        assert_eq!(cfg.export.file_prefix, "PR");
        assert_eq!(cfg.export.capture_config(), CaptureConfig::default());
        assert_eq!(cfg.workspace_padding, 64.0);
    }

    #[test]
    fn capture_parameters_cannot_be_configured() {
        for key in ["scale = 2.0", "allow_cross_origin = false", "transparent_background = false"] {
            let toml = format!("[export]\n{key}\n");
            assert!(StudioConfig::from_toml_str(&toml).is_err(), "{key}");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(StudioConfig::from_toml_str("padding = 3").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = StudioConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, StudioError::Io { .. }));
    }
}
