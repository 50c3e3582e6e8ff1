// src/config.rs
use std::path::PathBuf;

use serde::Deserialize;

use crate::entry_source::DEFAULT_API_URL;
use crate::error::ReportError;

pub const ENV_PREFIX: &str = "TIMESHEET_";

/// Runtime settings, read from `TIMESHEET_*` environment variables (and `.env`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Function key appended as `?code=`. Kept out of logs.
    #[serde(default)]
    pub api_code: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub exclude_deleted: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_code: None,
            output_dir: default_output_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            exclude_deleted: false,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ReportError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Same as `from_env` but over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }
}
