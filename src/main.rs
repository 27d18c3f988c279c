//! feedback-report - site feedback summary generator
//!
//! A CLI tool that collects form submissions from local storage or a
//! remote feedback endpoint and renders a windowed summary report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or validation error (bad window, config, write failure, etc.)
//!   2 - Report is empty and --fail-on-empty was set

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod sources;

use analysis::ReportWindow;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata};
use sources::remote::RemoteClient;
use sources::storage::JsonFileStore;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config file can raise verbosity, so it is read before logging starts.
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level());

    info!("feedback-report v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();
    debug!("Arguments: {:?}", args);

    match run_report(config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .feedback-report.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the report window, storage file and feedback endpoint.");
    Ok(())
}

/// Initialize logging at `level`.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not set tracing subscriber: {}", e);
    }
}

/// Run the complete report workflow. Returns exit code (0 or 2).
async fn run_report(config: Config) -> Result<i32> {
    // Invalid windows block before anything is read.
    let window = ReportWindow::parse(config.window.start.as_deref(), config.window.end.as_deref())?;

    let mode = config.report.mode;
    let format = config.report.format;
    let output_path = config.output_path();

    println!(
        "📅 Report period: {} – {}",
        window.start().format("%Y-%m-%d %H:%M UTC"),
        window.end().format("%Y-%m-%d %H:%M UTC")
    );
    println!("   Mode: {}", mode);

    let storage_path = Path::new(&config.storage.path);
    let store = JsonFileStore::load(storage_path);
    if store.is_empty() {
        debug!("Storage file {} holds no keys", storage_path.display());
    }
    info!(
        "Loaded {} storage keys from {}",
        store.len(),
        storage_path.display()
    );

    let remote_client = match config.remote_config() {
        Some(remote_config) => match RemoteClient::new(remote_config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Feedback endpoint disabled: {}", e);
                None
            }
        },
        None => {
            debug!("No feedback endpoint configured");
            None
        }
    };

    let spinner = generating_spinner(config.general.quiet);
    let collected = tokio::select! {
        collected = sources::collect_sources(mode, &store, remote_client.as_ref(), &window) => collected,
        _ = tokio::signal::ctrl_c() => {
            spinner.finish_and_clear();
            anyhow::bail!("Interrupted while collecting feedback");
        }
    };
    spinner.finish_and_clear();

    info!(
        "Collected {} raw records from {} sources",
        collected.raw_len(),
        collected.sources.len()
    );

    let result = analysis::generate_report(&collected.sources, &window);

    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        window_start: window.start(),
        window_end: window.end(),
        mode,
        sources: collected.source_names(),
        fell_back: collected.fell_back,
    };
    let report = Report::new(metadata, result);

    println!("\n📝 Writing {:?} report...", format);
    let output = render(&report, format)?;
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    let summary = &report.summary;
    println!("\n📊 Report Summary:");
    println!("   Total submissions: {}", summary.total);
    println!("   Unique senders: {}", summary.unique_emails);
    println!("   Average rating: {:.1}", summary.average_rating);
    println!("   Daily average: {:.1}", summary.daily_average);
    if report.metadata.fell_back {
        println!("   ⚠️  Feedback endpoint unavailable; used local storage");
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    if config.report.fail_on_empty && summary.total == 0 {
        eprintln!("\n⛔ No submissions found in the report period (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Render `report` in the requested format.
fn render(report: &Report, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Markdown => report::generate_markdown_report(report),
        OutputFormat::Json => report::generate_json_report(report)?,
        OutputFormat::Html => report::generate_html_report(report),
        OutputFormat::Csv => report::generate_csv(&report.items),
    })
}

/// The transient "generating" indicator; hidden in quiet mode.
fn generating_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Generating report...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Where the configuration came from, logged once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    Explicit(PathBuf),
    Default,
    Builtin,
    Unreadable(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::Default => info!("Loaded default config from {}", DEFAULT_CONFIG_FILE),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Unreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` path must load; a broken default file is only
/// reported and the built-in defaults are used.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    Ok(match Config::load_default() {
        Ok(Some(config)) => (config, ConfigSource::Default),
        Ok(None) => (Config::default(), ConfigSource::Builtin),
        Err(e) => (Config::default(), ConfigSource::Unreadable(format!("{:#}", e))),
    })
}
