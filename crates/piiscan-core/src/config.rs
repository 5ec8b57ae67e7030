//! Configuration management for piiscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default upper bound on the size of a single scanned file (100MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Default maximum directory depth for recursive scans.
pub const DEFAULT_MAX_SCAN_DEPTH: usize = 10;

/// Default number of files processed concurrently.
pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 16;

/// Main application configuration.
///
/// This is loaded from `~/.config/piiscan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PIISCAN_DETECT_ENABLED`: Override detection (true/false)
    /// - `PIISCAN_FIND_ENABLED`: Override match extraction (true/false)
    /// - `PIISCAN_MAX_CONCURRENT_FILES`: Override file concurrency
    /// - `PIISCAN_RULES`: Comma separated rule names to run
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides using `lookup` to resolve variable names.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PIISCAN_DETECT_ENABLED") {
            match val.parse() {
                Ok(enabled) => {
                    self.scanning.detect_enabled = enabled;
                    tracing::debug!("Override scanning.detect_enabled from env: {}", enabled);
                }
                Err(_) => tracing::warn!("Ignoring invalid PIISCAN_DETECT_ENABLED: {}", val),
            }
        }

        if let Some(val) = lookup("PIISCAN_FIND_ENABLED") {
            match val.parse() {
                Ok(enabled) => {
                    self.scanning.find_enabled = enabled;
                    tracing::debug!("Override scanning.find_enabled from env: {}", enabled);
                }
                Err(_) => tracing::warn!("Ignoring invalid PIISCAN_FIND_ENABLED: {}", val),
            }
        }

        if let Some(val) = lookup("PIISCAN_MAX_CONCURRENT_FILES") {
            match val.parse() {
                Ok(max) => {
                    self.scanning.max_concurrent_files = max;
                    tracing::debug!("Override scanning.max_concurrent_files from env: {}", max);
                }
                Err(_) => tracing::warn!("Ignoring invalid PIISCAN_MAX_CONCURRENT_FILES: {}", val),
            }
        }

        if let Some(val) = lookup("PIISCAN_RULES") {
            self.scanning.rules = val
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            tracing::debug!("Override scanning.rules from env: {:?}", self.scanning.rules);
        }
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        self.scanning.validate()
    }

    /// Save configuration to the default location.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/piiscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "piiscan", "piiscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Whether the detection pass runs
    pub detect_enabled: bool,
    /// Whether matched literals are extracted after detection
    pub find_enabled: bool,
    /// Rule names to run (empty runs every default rule)
    pub rules: Vec<String>,
    /// Number of files processed concurrently
    pub max_concurrent_files: usize,
    /// Files larger than this many bytes fail to load
    pub max_file_size_bytes: u64,
    /// Maximum directory depth for recursive scans
    pub max_scan_depth: usize,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            detect_enabled: true,
            find_enabled: false,
            rules: Vec::new(),
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            max_scan_depth: DEFAULT_MAX_SCAN_DEPTH,
        }
    }
}

impl ScanningConfig {
    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_concurrent_files == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.max_concurrent_files".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.max_file_size_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.max_file_size_bytes".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Include the event target in each line
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,piiscan=debug".to_string(),
            with_target: true,
        }
    }
}
