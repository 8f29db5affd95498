//! Events that can occur during a conversation

use crate::llm::CompletionError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// Raw input; trimming happens in the transition
    Submit {
        text: String,
        /// Generation the request will carry if the submission is accepted
        generation: u64,
    },
    NewConversation,

    // Completion events
    CompletionSucceeded {
        generation: u64,
        reply: String,
    },
    CompletionFailed {
        generation: u64,
        error: CompletionError,
    },
}
