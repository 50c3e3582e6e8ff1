// src/report.rs
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::aggregation::{aggregate, RankedSummary};
use crate::entry_source::EntrySource;
use crate::error::ReportError;
use crate::html_report::{render_html, write_html_document};
use crate::pie_chart::{render_png, write_png};
use crate::time_entries::parse_time_entries;

pub const DEFAULT_HTML_FILE_NAME: &str = "Employees.html";
pub const DEFAULT_CHART_FILE_NAME: &str = "PieChart.png";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub html_file_name: String,
    pub chart_file_name: String,
    /// Drop entries carrying a `DeletedOn` marker before aggregating.
    pub exclude_deleted: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            html_file_name: DEFAULT_HTML_FILE_NAME.to_string(),
            chart_file_name: DEFAULT_CHART_FILE_NAME.to_string(),
            exclude_deleted: false,
        }
    }
}

impl ReportOptions {
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file_name)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file_name)
    }
}

/// Both artifacts, fully rendered in memory.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub summary: RankedSummary,
    pub html: String,
    pub png: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReport {
    pub html_path: PathBuf,
    pub chart_path: PathBuf,
}

impl ReportArtifacts {
    pub fn write_to(&self, options: &ReportOptions) -> Result<WrittenReport, ReportError> {
        let html_path = options.html_path();
        let chart_path = options.chart_path();
        write_html_document(&self.html, &html_path)?;
        write_png(&self.png, &chart_path)?;
        Ok(WrittenReport {
            html_path: absolute(&html_path),
            chart_path: absolute(&chart_path),
        })
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Runs parse, aggregate and both renderers without touching the filesystem.
pub fn build_report(raw: &str, options: &ReportOptions) -> Result<ReportArtifacts, ReportError> {
    info!("Parsing JSON...");
    let mut entries = parse_time_entries(raw)?;
    info!("Parsed {} time entries", entries.len());

    if options.exclude_deleted {
        let before = entries.len();
        entries.retain(|e| !e.is_deleted());
        info!("Excluded {} deleted entries", before - entries.len());
    }

    info!("Calculating total hours per employee...");
    let summary = aggregate(&entries)?;

    let html = render_html(&summary);
    let png = render_png(&summary)?;
    Ok(ReportArtifacts { summary, html, png })
}

/// Fetches the payload and produces both report files.
pub async fn run(
    source: &dyn EntrySource,
    options: &ReportOptions,
) -> Result<WrittenReport, ReportError> {
    let outcome = async {
        let raw = source.fetch_raw().await?;
        let artifacts = build_report(&raw, options)?;
        let written = artifacts.write_to(options)?;
        Ok::<_, ReportError>(written)
    }
    .await;

    match &outcome {
        Ok(_) => info!("Done!"),
        Err(e) => error!("Report run failed during {}: {}", e.phase(), e),
    }
    outcome
}
