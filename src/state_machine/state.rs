//! Turn state types

use crate::transcript::Message;

/// Initial assistant greeting of a fresh session
pub const DEFAULT_GREETING: &str =
    "Hey, I’m your local ChatGPT-style clone. What do you want to ask?";

/// Greeting seeded by "new conversation"
pub const DEFAULT_NEW_CHAT_GREETING: &str = "New chat started. Ask me anything.";

/// What the user sees when a turn fails, whatever the cause
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something broke talking to the backend.";

/// Submission lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready for input, nothing outstanding
    #[default]
    Idle,

    /// Exactly one request in flight, tagged with its generation
    Submitting { generation: u64 },

    /// Last turn failed; ready for input
    Error { message: String },
}

impl TurnState {
    /// A request is outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self, TurnState::Submitting { .. })
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            TurnState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Generation of the outstanding request, if any
    #[allow(dead_code)] // State query utility
    pub fn in_flight(&self) -> Option<u64> {
        match self {
            TurnState::Submitting { generation } => Some(*generation),
            _ => None,
        }
    }
}

/// Fixed texts of a session (immutable configuration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    pub greeting: String,
    pub new_chat_greeting: String,
    pub failure_message: String,
}

impl Default for TurnContext {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            new_chat_greeting: DEFAULT_NEW_CHAT_GREETING.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl TurnContext {
    pub fn initial_seed(&self) -> Message {
        Message::assistant(self.greeting.clone())
    }

    pub fn new_chat_seed(&self) -> Message {
        Message::assistant(self.new_chat_greeting.clone())
    }
}
