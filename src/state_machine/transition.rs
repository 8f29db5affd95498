//! Pure state transition function

use super::{Effect, Event, TurnContext, TurnState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Nothing changes
    pub fn unchanged(state: &TurnState) -> Self {
        Self::new(state.clone())
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending, wait for it before sending another message")]
    Busy,
    #[error("Response for generation {generation} arrived after it was abandoned")]
    StaleResponse { generation: u64 },
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs and performs no
/// I/O. Effects are listed in the order they must be applied.
pub fn transition(
    state: &TurnState,
    context: &TurnContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (TurnState::Submitting { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        (TurnState::Idle | TurnState::Error { .. }, Event::Submit { text, generation }) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(TransitionResult::unchanged(state));
            }

            Ok(TransitionResult::new(TurnState::Submitting { generation })
                .with_effect(Effect::append_user(trimmed))
                .with_effect(Effect::RequestCompletion { generation }))
        }

        // ============================================================
        // Completion
        // ============================================================
        (
            TurnState::Submitting { generation: current },
            Event::CompletionSucceeded { generation, reply },
        ) if *current == generation => Ok(TransitionResult::new(TurnState::Idle)
            .with_effect(Effect::append_assistant(reply))),

        (
            TurnState::Submitting { generation: current },
            Event::CompletionFailed { generation, .. },
        ) if *current == generation => Ok(TransitionResult::new(TurnState::Error {
            message: context.failure_message.clone(),
        })),

        // Abandoned by a reset, or never issued
        (
            _,
            Event::CompletionSucceeded { generation, .. } | Event::CompletionFailed { generation, .. },
        ) => Err(TransitionError::StaleResponse { generation }),

        // ============================================================
        // New conversation
        // ============================================================
        (TurnState::Submitting { generation }, Event::NewConversation) => {
            Ok(TransitionResult::new(TurnState::Idle)
                .with_effect(Effect::AbortRequest {
                    generation: *generation,
                })
                .with_effect(Effect::ResetTranscript(context.new_chat_seed())))
        }

        (TurnState::Idle | TurnState::Error { .. }, Event::NewConversation) => {
            Ok(TransitionResult::new(TurnState::Idle)
                .with_effect(Effect::ResetTranscript(context.new_chat_seed())))
        }
    }
}
