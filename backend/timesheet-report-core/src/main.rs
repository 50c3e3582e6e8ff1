// src/main.rs
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timesheet_report_core::entry_source::{EntrySource, FileEntrySource, HttpEntrySource};
use timesheet_report_core::{run, ReportConfig, ReportOptions};

/// Ranks employees by hours worked and writes an HTML table and a pie chart.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Read the time-entry payload from this file instead of the API
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory the report files are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Time-entries endpoint (overrides TIMESHEET_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Skip entries that carry a DeletedOn marker
    #[arg(long)]
    exclude_deleted: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ReportConfig::from_env().context("Loading configuration failed")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    config.exclude_deleted |= cli.exclude_deleted;
    info!("Configuration loaded.");

    let source: Box<dyn EntrySource> = match cli.input {
        Some(path) => Box::new(FileEntrySource::new(path)),
        None => Box::new(
            HttpEntrySource::new(
                &config.api_url,
                config.api_code.as_deref(),
                Duration::from_secs(config.request_timeout_secs),
            )
            .context("Creating HTTP client failed")?,
        ),
    };

    let options = ReportOptions {
        output_dir: config.output_dir.clone(),
        exclude_deleted: config.exclude_deleted,
        ..ReportOptions::default()
    };

    let written = run(source.as_ref(), &options)
        .await
        .context("Generating the hours report failed")?;
    info!(
        "Report written: {} and {}",
        written.html_path.display(),
        written.chart_path.display()
    );
    Ok(())
}
