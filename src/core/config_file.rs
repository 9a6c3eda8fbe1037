//! User configuration file handling
//!
//! Manages settings from ~/.config/numderline/settings.json

use crate::core::errors::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// User configuration from ~/.config/numderline/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Gap size: a number of font units or a single character
    pub gap: Option<String>,
    pub squish_x: Option<f64>,
    pub squish_y: Option<f64>,
    pub monospace: Option<bool>,
    pub squish_all: Option<bool>,
    pub feature: Option<String>,
    /// `false` keeps the original font names
    pub rename: Option<bool>,
    pub hex: Option<bool>,
    pub dot_separator: Option<char>,
    pub comma_separator: Option<char>,
    /// Replacements applied to output file names, e.g. `[["Source", "Sauce"]]`
    pub reserved_names: Option<Vec<(String, String)>>,
    pub output_dir: Option<PathBuf>,
    /// Path to the `fontc` executable
    pub fontc: Option<PathBuf>,
}

impl ConfigFile {
    /// Get the path to the numderline config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("numderline")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load the default config file. A missing file is not an error.
    pub fn load_default() -> BuildResult<Option<Self>> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Load a config file; unreadable or malformed files are configuration
    /// errors
    pub fn load(path: &Path) -> BuildResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BuildError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = serde_json::from_str(&contents).map_err(|e| {
            BuildError::Configuration(format!("cannot parse {}: {e}", path.display()))
        })?;
        debug!("Loaded user settings from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let config = ConfigFile {
            gap: Some("120".to_string()),
            monospace: Some(true),
            reserved_names: Some(vec![("Fira".to_string(), "Fura".to_string())]),
            ..ConfigFile::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "squish_y": 0.9, "feature": "liga" }"#).unwrap();
        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.squish_y, Some(0.9));
        assert_eq!(config.feature.as_deref(), Some("liga"));
        assert!(config.gap.is_none());
    }

    #[test]
    fn test_unknown_key_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "theme": "dark" }"#).unwrap();
        let err = ConfigFile::load(&path).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }
}
