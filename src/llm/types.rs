//! Wire types for the completion endpoint

use super::CompletionError;
use crate::transcript::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the outbound request: the full transcript, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Decoded success body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    pub reply: String,
}

impl CompletionResponse {
    /// Validate a raw response body.
    ///
    /// The body must be a JSON object whose `reply` is a string with at least
    /// one non-whitespace character. Anything else is a protocol error; no
    /// field is assumed present.
    pub fn decode(body: &str) -> Result<Self, CompletionError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| CompletionError::protocol(format!("Response is not valid JSON: {e}")))?;

        let Some(object) = value.as_object() else {
            return Err(CompletionError::protocol("Response is not a JSON object"));
        };

        match object.get("reply") {
            None => Err(CompletionError::protocol("Response has no `reply` field")),
            Some(Value::String(reply)) if reply.trim().is_empty() => {
                Err(CompletionError::protocol("Response `reply` is empty"))
            }
            Some(Value::String(reply)) => Ok(Self {
                reply: reply.clone(),
            }),
            Some(other) => Err(CompletionError::protocol(format!(
                "Response `reply` is not a string: {other}"
            ))),
        }
    }
}
