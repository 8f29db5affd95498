//! HTTP completion endpoint client

use super::types::{CompletionRequest, CompletionResponse};
use super::{CompletionError, CompletionService};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Longest slice of an error body carried into a diagnostic
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Talks to a `POST {"messages": [...]} -> {"reply": "..."}` endpoint
pub struct HttpCompletionService {
    client: Client,
    endpoint: Url,
}

impl HttpCompletionService {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// `GET /health` on the endpoint's origin.
    pub async fn probe_health(&self) -> Result<(), CompletionError> {
        let url = self
            .endpoint
            .join("/health")
            .map_err(|e| CompletionError::protocol(format!("Invalid health URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CompletionError::protocol(format!("Health check returned HTTP {status}")))
        }
    }

    fn classify_status(status: StatusCode, body: &str) -> CompletionError {
        let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        CompletionError::protocol(format!("HTTP {status}: {excerpt}"))
    }
}

fn transport_error(e: &reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::transport(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        CompletionError::transport(format!("Connection failed: {e}"))
    } else {
        CompletionError::transport(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }

        CompletionResponse::decode(&body).map(|decoded| decoded.reply)
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}
