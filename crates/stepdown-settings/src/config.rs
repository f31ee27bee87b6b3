//! Persistent defaults for stepdown
//!
//! Settings are organized into two sections:
//! - Pass settings (increment, minimum cut, skip height, feed override)
//! - Output settings (pretty printing, skip annotations, alignment)
//!
//! Every field is optional in the file; missing fields keep their defaults.
//! JSON and TOML are both accepted, chosen by file extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stepdown_camtools::{Alignment, OutputStyle, PassParameters};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config dir
const APP_DIR: &str = "stepdown";

/// Settings file name inside [`APP_DIR`]
const CONFIG_FILE: &str = "config.toml";

/// Step-down parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassSettings {
    /// Depth of cut per pass (negative)
    pub increment: f64,
    /// Thickness left for the finishing pass
    pub min_cut: f64,
    /// Clearance height for rapid traversal
    pub skip_height: f64,
    /// Feed rate for the incremental passes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_override: Option<i32>,
}

impl Default for PassSettings {
    fn default() -> Self {
        let params = PassParameters::default();
        Self {
            increment: params.increment,
            min_cut: params.min_cut,
            skip_height: params.skip_height,
            feed_override: params.feed_override,
        }
    }
}

/// Output presentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print generated G-code
    pub pretty: bool,
    /// Emit `;skip` comments for elided lines
    pub annotate_skips: bool,
    /// Body realignment
    pub alignment: Alignment,
}

/// Complete settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pass settings
    pub passes: PassSettings,
    /// Output settings
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file location, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the settings file at the default location
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load_default() -> SettingsResult<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| SettingsError::SaveError(e.to_string()))?
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.pass_parameters().validate()?;
        Ok(())
    }

    /// Pass parameters for the engine
    pub fn pass_parameters(&self) -> PassParameters {
        PassParameters {
            increment: self.passes.increment,
            min_cut: self.passes.min_cut,
            skip_height: self.passes.skip_height,
            feed_override: self.passes.feed_override,
        }
    }

    /// Output style for the engine
    pub fn output_style(&self) -> OutputStyle {
        OutputStyle {
            pretty: self.output.pretty,
            annotate_skips: self.output.annotate_skips,
        }
    }
}
