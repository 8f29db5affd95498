//! Completion service abstraction
//!
//! The remote endpoint is opaque: it takes the transcript and hands back the
//! next assistant turn, or fails.

mod error;
mod http;
mod types;

#[cfg(test)]
mod proptests;

pub use error::{CompletionError, CompletionErrorKind};
pub use http::HttpCompletionService;
pub use types::CompletionRequest;

use async_trait::async_trait;

/// Common interface for completion endpoints
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send the transcript and return the reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Where requests are sent, for logging
    fn endpoint(&self) -> &str;
}

/// Logging wrapper for completion services
pub struct LoggingService<S> {
    inner: S,
}

impl<S: CompletionService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CompletionService> CompletionService for LoggingService<S> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    reply_chars = reply.chars().count(),
                    "Completion request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
