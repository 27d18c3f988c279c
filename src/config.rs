//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.feedback-report.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::models::ReportMode;
use crate::sources::remote::RemoteConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".feedback-report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report window.
    #[serde(default)]
    pub window: WindowConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Feedback endpoint settings.
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path; derived from the format when unset.
    #[serde(default)]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Only log errors and hide the progress spinner.
    #[serde(default)]
    pub quiet: bool,
}

/// Report window bounds, as RFC 3339 timestamps or dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub start: Option<String>,

    #[serde(default)]
    pub end: Option<String>,
}

/// Local storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the stored keys.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "feedback_storage.json".to_string()
}

/// Feedback endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Endpoint URL; the remote source is skipped when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token for the endpoint.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    15
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Live or demo data.
    #[serde(default)]
    pub mode: ReportMode,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Exit with code 2 when the report is empty.
    #[serde(default)]
    pub fail_on_empty: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref start) = args.start {
            self.window.start = Some(start.clone());
        }
        if let Some(ref end) = args.end {
            self.window.end = Some(end.clone());
        }

        if let Some(ref storage) = args.storage {
            self.storage.path = storage.display().to_string();
        }

        if let Some(ref base_url) = args.base_url {
            self.remote.base_url = Some(base_url.clone());
        }
        if let Some(ref api_key) = args.api_key {
            self.remote.api_key = Some(api_key.clone());
        }
        if let Some(timeout) = args.timeout {
            self.remote.timeout_seconds = timeout;
        }

        if let Some(mode) = args.mode {
            self.report.mode = mode;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        // Flags always override
        if args.fail_on_empty {
            self.report.fail_on_empty = true;
        }
        if args.verbose {
            self.general.verbose = true;
            self.general.quiet = false;
        }
        if args.quiet {
            self.general.quiet = true;
            self.general.verbose = false;
        }
    }

    /// Log level from the merged verbosity settings; quiet wins over verbose.
    pub fn log_level(&self) -> tracing::Level {
        if self.general.quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Remote settings, when both URL and key are present.
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        let base_url = self.remote.base_url.as_deref().filter(|s| !s.is_empty())?;
        let api_key = self.remote.api_key.as_deref().filter(|s| !s.is_empty())?;

        Some(RemoteConfig {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            timeout_seconds: self.remote.timeout_seconds,
        })
    }

    /// Output path, falling back to `feedback_report.<ext>`.
    pub fn output_path(&self) -> PathBuf {
        match self.general.output {
            Some(ref output) => PathBuf::from(output),
            None => PathBuf::from(format!("feedback_report.{}", self.report.format.extension())),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.window.start = Some("2025-08-17T23:56:00.418+00:00".to_string());
        config.window.end = Some("2025-09-19T21:05:44.838+00:00".to_string());
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
