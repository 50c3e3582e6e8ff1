// src/entry_source.rs
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{error, info};
use url::Url;

use crate::error::ReportError;

/// Default endpoint of the time-entries API. The function key is supplied separately.
pub const DEFAULT_API_URL: &str = "https://rc-vault-fap-live-1.azurewebsites.net/api/gettimeentries";

/// Where the raw time-entry payload comes from.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Returns the payload text exactly as received.
    async fn fetch_raw(&self) -> Result<String, ReportError>;

    /// Human readable origin, for logging.
    fn describe(&self) -> String;
}

// --- HTTP ---

#[derive(Clone)]
pub struct HttpEntrySource {
    http_client: Client,
    url: Url,
}

impl HttpEntrySource {
    pub fn new(api_url: &str, api_code: Option<&str>, timeout: Duration) -> Result<Self, ReportError> {
        let url = build_request_url(api_url, api_code)?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Config(format!("could not build HTTP client: {}", e)))?;
        Ok(Self { http_client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Appends the optional function key as the `code` query parameter.
pub fn build_request_url(api_url: &str, api_code: Option<&str>) -> Result<Url, ReportError> {
    let mut url = Url::parse(api_url)
        .map_err(|e| ReportError::Config(format!("invalid API URL {:?}: {}", api_url, e)))?;
    if let Some(code) = api_code.filter(|c| !c.is_empty()) {
        url.query_pairs_mut().append_pair("code", code);
    }
    Ok(url)
}

#[async_trait]
impl EntrySource for HttpEntrySource {
    async fn fetch_raw(&self) -> Result<String, ReportError> {
        info!("Fetching time entries from {}", self.describe());
        let response = self
            .http_client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let error_text = response.text().await.ok();
            error!(
                "Time entries request failed. Status: {}, Body: {:?}",
                status, error_text
            );
            Err(ReportError::FetchFailure(format!(
                "API returned {}: {}",
                status,
                error_text.unwrap_or_default()
            )))
        }
    }

    fn describe(&self) -> String {
        // Never log the function key.
        let mut shown = self.url.clone();
        shown.set_query(None);
        shown.to_string()
    }
}

// --- File ---

/// Reads a previously saved payload, for offline runs.
#[derive(Debug, Clone)]
pub struct FileEntrySource {
    path: PathBuf,
}

impl FileEntrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EntrySource for FileEntrySource {
    async fn fetch_raw(&self) -> Result<String, ReportError> {
        info!("Reading time entries from {}", self.describe());
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ReportError::FetchFailure(format!("could not read {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
