//! Mock implementations for testing
//!
//! These mocks enable controller and session tests without real I/O.

use crate::llm::{CompletionError, CompletionRequest, CompletionService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Completion Service
// ============================================================================

/// Mock completion service that returns queued outcomes
pub struct MockCompletionService {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: CompletionError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_outcome(&self) -> Result<String, CompletionError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::transport("No mock response queued")))
    }
}

impl Default for MockCompletionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_outcome()
    }

    fn endpoint(&self) -> &str {
        "mock://completion"
    }
}

// ============================================================================
// Delayed Mock Completion Service (for reset-during-flight testing)
// ============================================================================

/// Mock completion service with configurable delay
pub struct DelayedMockCompletionService {
    inner: MockCompletionService,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockCompletionService {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockCompletionService::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.inner.queue_reply(reply);
    }

    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl CompletionService for DelayedMockCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_waiters();
        tokio::time::sleep(self.delay).await;
        self.inner.next_outcome()
    }

    fn endpoint(&self) -> &str {
        "mock://delayed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionErrorKind;
    use crate::transcript::Message;

    #[tokio::test]
    async fn test_mock_completion_service() {
        let mock = MockCompletionService::new();
        mock.queue_reply("Hello");

        let request = CompletionRequest::new(vec![Message::user("hi")]);

        let reply = mock.complete(&request).await.unwrap();
        assert_eq!(reply, "Hello");

        // Second call should fail (no more responses)
        let err = mock.complete(&request).await.unwrap_err();
        assert_eq!(err.kind, CompletionErrorKind::Transport);
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_mock_waits() {
        let mock = DelayedMockCompletionService::new(Duration::from_secs(30));
        mock.queue_reply("eventually");
        let request = CompletionRequest::new(vec![Message::user("hi")]);

        let reply = mock.complete(&request).await.unwrap();
        assert_eq!(reply, "eventually");
        assert_eq!(mock.recorded_requests().len(), 1);
    }
}
