// src/error.rs
use thiserror::Error;

/// Everything that can abort a report run. All variants are fatal.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to fetch time entries: {0}")]
    FetchFailure(String),

    #[error("Time entry payload is malformed: {0}")]
    MalformedPayload(String),

    #[error("Entry {entry_id} has an unparseable {field}: {value:?}")]
    BadTimestamp {
        entry_id: String,
        field: &'static str,
        value: Option<String>,
    },

    #[error("Summary has zero total hours, cannot compute chart proportions")]
    EmptyDataset,

    #[error("Failed to render {artifact}: {reason}")]
    RenderFailure {
        artifact: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    /// Pipeline phase the error belongs to, used as log context.
    pub fn phase(&self) -> &'static str {
        match self {
            ReportError::FetchFailure(_) => "fetch",
            ReportError::MalformedPayload(_) => "parse",
            ReportError::BadTimestamp { .. } => "aggregate",
            ReportError::EmptyDataset | ReportError::RenderFailure { .. } => "render",
            ReportError::Config(_) => "config",
        }
    }

    pub(crate) fn render(artifact: &'static str, reason: impl ToString) -> Self {
        ReportError::RenderFailure {
            artifact,
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        ReportError::FetchFailure(e.to_string())
    }
}

impl From<envy::Error> for ReportError {
    fn from(e: envy::Error) -> Self {
        ReportError::Config(e.to_string())
    }
}
