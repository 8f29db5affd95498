//! Conversation transcript
//!
//! The ordered message history of one conversation. Appends only grow it;
//! `reset` is the only way to replace it, and always leaves exactly one
//! seeded message behind.

use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Label shown next to the message when rendering
    pub fn display_name(self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single turn in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[allow(dead_code)] // Constructor for API completeness
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered message history, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a conversation from its seed message
    pub fn seeded(seed: Message) -> Self {
        Self {
            messages: vec![seed],
        }
    }

    pub fn append(&mut self, message: Message) {
        debug_assert!(
            message.role == Role::System || !message.content.is_empty(),
            "only system messages may be empty"
        );
        self.messages.push(message);
    }

    /// Discard the whole history and start over from `seed`
    pub fn reset(&mut self, seed: Message) {
        self.messages = vec![seed];
    }

    /// Owned copy of the history as it is right now
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    #[allow(dead_code)] // Read accessor for renderers and tests
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)] // Always false; kept alongside len()
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[allow(dead_code)] // Read accessor for renderers and tests
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}
