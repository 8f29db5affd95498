//! Environment configuration

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MYGPT_ENDPOINT is not a valid URL ({value}): {reason}")]
    InvalidEndpoint { value: String, reason: String },
}

/// How log lines are formatted on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Completion endpoint receiving `POST {"messages": [...]}`
    pub endpoint: Url,
    /// Transport timeout for a single request
    pub timeout: Duration,
    pub log_format: LogFormat,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("MYGPT_ENDPOINT").ok(),
            std::env::var("MYGPT_TIMEOUT_SECS").ok(),
            std::env::var("MYGPT_LOG_FORMAT").ok(),
        )
    }

    fn from_vars(
        endpoint: Option<String>,
        timeout_secs: Option<String>,
        log_format: Option<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            reason: e.to_string(),
            value: endpoint.clone(),
        })?;

        let timeout_secs = timeout_secs
            .and_then(|t| t.trim().parse::<u64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_format = match log_format.as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            log_format,
        })
    }
}
