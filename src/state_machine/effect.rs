//! Effects produced by state transitions

use crate::transcript::Message;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a turn to the transcript
    AppendMessage(Message),

    /// Replace the transcript with a single seed message
    ResetTranscript(Message),

    /// Send the transcript as it stands after the preceding effects
    RequestCompletion { generation: u64 },

    /// Abandon the outstanding request
    AbortRequest { generation: u64 },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage(Message::user(text))
    }

    pub fn append_assistant(text: impl Into<String>) -> Self {
        Effect::AppendMessage(Message::assistant(text))
    }
}
