//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ReportMode;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// feedback-report - summarize site feedback submissions
///
/// Reads submissions from a local storage file (and optionally a remote
/// feedback endpoint), filters them to a time window, and writes a report
/// with totals, unique senders, average rating and daily average.
///
/// Examples:
///   feedback-report --start 2025-08-17 --end 2025-09-19
///   feedback-report --start 2025-09-01 --end 2025-09-30 --storage site_storage.json --format html
///   feedback-report --start 2025-09-01 --end 2025-09-30 --base-url https://api.example.com/feedback
///   feedback-report --start 2025-09-01 --end 2025-09-30 --mode demo
///   feedback-report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Start of the report window (inclusive)
    ///
    /// RFC 3339 timestamp or YYYY-MM-DD. Can also be set in the config file.
    #[arg(short, long, value_name = "DATE")]
    pub start: Option<String>,

    /// End of the report window (inclusive)
    ///
    /// RFC 3339 timestamp or YYYY-MM-DD. A bare date means midnight UTC.
    #[arg(short, long, value_name = "DATE")]
    pub end: Option<String>,

    /// Local storage file (JSON object of storage keys)
    #[arg(long, value_name = "FILE")]
    pub storage: Option<PathBuf>,

    /// Where records come from
    ///
    /// live: the feedback endpoint when configured, local storage otherwise.
    /// demo: the built-in demonstration dataset only.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ReportMode>,

    /// Feedback endpoint URL
    #[arg(long, value_name = "URL", env = "FEEDBACK_BASE_URL")]
    pub base_url: Option<String>,

    /// API key sent as a bearer token to the feedback endpoint
    #[arg(long, value_name = "KEY", env = "FEEDBACK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout for the feedback endpoint in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (markdown, json, html, csv)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report
    ///
    /// Defaults to feedback_report with the extension of the chosen format.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .feedback-report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when the report contains no submissions
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Generate a default .feedback-report.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// Standalone HTML page
    Html,
    /// CSV export of the submissions
    Csv,
}

impl OutputFormat {
    /// File extension used for the default output path.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Feedback endpoint URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref storage) = self.storage {
            if storage.is_dir() {
                return Err(format!(
                    "Storage path is a directory: {}",
                    storage.display()
                ));
            }
        }

        Ok(())
    }
}
