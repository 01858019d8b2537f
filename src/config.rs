//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application
//! configuration in TOML format with platform-specific directory
//! resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{AUDIO_PROBE_TIMEOUT_SECS, DEFAULT_AUDIO_URL};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Assets directory holding the layout JSON and shelf/product art.
    /// Defaults to `<config dir>/assets` when unset.
    pub assets_dir: Option<PathBuf>,
}

/// Audio narration service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Base URL of the local narration service.
    #[serde(default = "default_audio_url")]
    pub base_url: String,
    /// Availability probe timeout in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_audio_url() -> String {
    DEFAULT_AUDIO_URL.to_string()
}

const fn default_probe_timeout() -> u64 {
    AUDIO_PROBE_TIMEOUT_SECS
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            base_url: default_audio_url(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Planoguia/config.toml`
/// - macOS: `~/Library/Application Support/Planoguia/config.toml`
/// - Windows: `%APPDATA%\Planoguia\config.toml`
///
/// # Validation
///
/// - `assets_dir`, when set, must exist and be a directory
/// - `audio.base_url` must be non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Audio narration settings
    #[serde(default)]
    pub audio: AudioConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("Planoguia");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolves the effective assets directory.
    ///
    /// Uses the configured path when set, otherwise `<config dir>/assets`.
    pub fn assets_dir(&self) -> Result<PathBuf> {
        match &self.paths.assets_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("assets")),
        }
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        // Ensure config directory exists
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if let Some(assets_dir) = &self.paths.assets_dir {
            if !assets_dir.exists() || !assets_dir.is_dir() {
                anyhow::bail!("Assets directory does not exist: {}", assets_dir.display());
            }
        }

        if self.audio.base_url.trim().is_empty() {
            anyhow::bail!("Audio service base URL must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.assets_dir, None);
        assert_eq!(config.audio.base_url, DEFAULT_AUDIO_URL);
        assert_eq!(config.audio.probe_timeout_secs, AUDIO_PROBE_TIMEOUT_SECS);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_assets_dir() {
        let mut config = Config::new();
        config.paths.assets_dir = Some(PathBuf::from("/nonexistent/planoguia/assets"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_existing_assets_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new();
        config.paths.assets_dir = Some(dir.path().to_path_buf());
        assert!(config.validate().is_ok());
        assert_eq!(config.assets_dir().unwrap(), dir.path());
    }

    #[test]
    fn test_validate_empty_audio_url() {
        let mut config = Config::new();
        config.audio.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::new();
        config.ui.theme_mode = ThemeMode::Dark;
        config.audio.base_url = "http://localhost:9000".to_string();

        let encoded = toml::to_string_pretty(&config).unwrap();
        let decoded: Config = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let decoded: Config = toml::from_str("[paths]\n").unwrap();
        assert_eq!(decoded.audio.base_url, DEFAULT_AUDIO_URL);
        assert_eq!(decoded.ui.theme_mode, ThemeMode::Auto);
    }
}
