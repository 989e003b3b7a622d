//! Configuration loading, validation, and management for Chronicler.
//!
//! Loads configuration from `~/.chronicler/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chronicler/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log output format: "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Staging and packaging settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

fn default_log_format() -> String {
    "pretty".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Scratch directory wiped before every channel run
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Suffix of the transcript file: `<channel>_<suffix>`
    #[serde(default = "default_text_log_suffix")]
    pub text_log_suffix: String,

    /// Name of the attachment subdirectory inside the archive
    #[serde(default = "default_attachments_dir")]
    pub attachments_dir: String,

    /// Deflate level (0-9). Unset = library default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<i64>,
}

fn default_staging_dir() -> PathBuf {
    AppConfig::config_dir().join("staging")
}
fn default_text_log_suffix() -> String {
    "text_log.txt".into()
}
fn default_attachments_dir() -> String {
    "images".into()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            text_log_suffix: default_text_log_suffix(),
            attachments_dir: default_attachments_dir(),
            compression_level: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Where delivered artifacts are copied
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Size limit used only when neither the command line nor the server
    /// supplies one.
    #[serde(default = "default_filesize_limit")]
    pub fallback_filesize_limit: u64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("archives")
}
fn default_filesize_limit() -> u64 {
    8 * 1024 * 1024
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            fallback_filesize_limit: default_filesize_limit(),
        }
    }
}

impl AppConfig {
    /// Load `path` (normally [`AppConfig::config_path`]), then apply
    /// overrides looked up through `var`, usually `std::env::var`.
    ///
    /// Overrides (highest priority):
    /// - `CHRONICLER_STAGING_DIR`
    /// - `CHRONICLER_OUTPUT_DIR`
    /// - `CHRONICLER_FILESIZE_LIMIT`
    pub fn load_with(
        path: &Path,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(var)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(dir) = var("CHRONICLER_STAGING_DIR") {
            self.archive.staging_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("CHRONICLER_OUTPUT_DIR") {
            self.delivery.output_dir = PathBuf::from(dir);
        }
        if let Some(limit) = var("CHRONICLER_FILESIZE_LIMIT") {
            self.delivery.fallback_filesize_limit = limit.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CHRONICLER_FILESIZE_LIMIT must be a byte count, got '{limit}'"
                ))
            })?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chronicler")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "log_format must be \"pretty\" or \"json\", got \"{}\"",
                self.log_format
            )));
        }

        if let Some(level) = self.archive.compression_level {
            if !(0..=9).contains(&level) {
                return Err(ConfigError::ValidationError(
                    "archive.compression_level must be between 0 and 9".into(),
                ));
            }
        }

        if self.archive.text_log_suffix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "archive.text_log_suffix must not be empty".into(),
            ));
        }

        let dir = &self.archive.attachments_dir;
        if dir.is_empty() || dir.contains(['/', '\\']) || dir == "." || dir == ".." {
            return Err(ConfigError::ValidationError(
                "archive.attachments_dir must be a single directory name".into(),
            ));
        }

        if self.delivery.fallback_filesize_limit == 0 {
            return Err(ConfigError::ValidationError(
                "delivery.fallback_filesize_limit must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            archive: ArchiveConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
