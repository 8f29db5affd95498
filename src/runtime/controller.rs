//! Turn controller
//!
//! Owns the transcript and the turn state. Every mutation goes through the
//! pure `transition` function; the controller only executes the resulting
//! effects. Renderers get read-only `SessionView` snapshots.

use crate::llm::{CompletionError, CompletionRequest, CompletionService};
use crate::state_machine::{transition, Effect, Event, TransitionError, TurnContext, TurnState};
use crate::transcript::{Message, Role, Transcript};
use std::sync::Arc;

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub messages: Vec<Message>,
    pub pending: bool,
    pub last_error: Option<String>,
}

/// A request the caller must send, tagged with its generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub generation: u64,
    pub request: CompletionRequest,
}

impl Outbound {
    /// Send the request and pair the outcome with its generation
    pub async fn send<C: CompletionService + ?Sized>(
        self,
        client: &C,
    ) -> (u64, Result<String, CompletionError>) {
        let outcome = client.complete(&self.request).await;
        (self.generation, outcome)
    }
}

/// What happened to a completion outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The generation was no longer outstanding; nothing changed
    Discarded,
}

/// Everything an applied transition asks the caller to do
#[derive(Debug, Default)]
struct Applied {
    outbound: Option<Outbound>,
    aborted: Option<u64>,
}

pub struct TurnController<C: CompletionService + ?Sized> {
    context: TurnContext,
    state: TurnState,
    transcript: Transcript,
    last_generation: u64,
    client: Arc<C>,
}

impl<C: CompletionService + ?Sized> TurnController<C> {
    pub fn new(context: TurnContext, client: Arc<C>) -> Self {
        let transcript = Transcript::seeded(context.initial_seed());
        Self {
            context,
            state: TurnState::Idle,
            transcript,
            last_generation: 0,
            client,
        }
    }

    #[allow(dead_code)] // State query utility
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    #[allow(dead_code)] // State query utility
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            messages: self.transcript.snapshot(),
            pending: self.state.is_pending(),
            last_error: self.state.last_error().map(str::to_string),
        }
    }

    /// Accept a submission and return the request to issue.
    ///
    /// `Ok(None)` means the input was blank and nothing changed. The caller
    /// must feed the outcome of the returned request back through `resolve`.
    pub fn begin_submit(&mut self, raw: &str) -> Result<Option<Outbound>, TransitionError> {
        let event = Event::Submit {
            text: raw.to_string(),
            generation: self.last_generation + 1,
        };
        let applied = self.apply(event)?;
        Ok(applied.outbound)
    }

    /// Reconcile the transcript with the outcome of request `generation`
    pub fn resolve(
        &mut self,
        generation: u64,
        outcome: Result<String, CompletionError>,
    ) -> Resolution {
        let event = match outcome {
            Ok(reply) => Event::CompletionSucceeded { generation, reply },
            Err(error) => {
                tracing::warn!(
                    generation,
                    kind = error.kind.as_str(),
                    error = %error.message,
                    "Turn failed"
                );
                Event::CompletionFailed { generation, error }
            }
        };

        match self.apply(event) {
            Ok(_) => Resolution::Applied,
            Err(e) => {
                tracing::debug!(generation, reason = %e, "Discarding completion outcome");
                Resolution::Discarded
            }
        }
    }

    /// Submit and wait for the reply in one step.
    ///
    /// Failures of the request itself are recorded as the session error, not
    /// returned; only a rejected submission is an `Err`.
    pub async fn submit(&mut self, raw: &str) -> Result<(), TransitionError> {
        let Some(outbound) = self.begin_submit(raw)? else {
            return Ok(());
        };
        let client = self.client();
        let (generation, outcome) = outbound.send(&*client).await;
        self.resolve(generation, outcome);
        Ok(())
    }

    /// Start over from the new-chat greeting.
    ///
    /// Returns the generation of the request abandoned by the reset, if one
    /// was in flight; its outcome will be discarded.
    pub fn new_conversation(&mut self) -> Option<u64> {
        match self.apply(Event::NewConversation) {
            Ok(applied) => applied.aborted,
            Err(e) => {
                // Every state accepts NewConversation
                tracing::error!(error = %e, "New conversation rejected");
                None
            }
        }
    }

    fn apply(&mut self, event: Event) -> Result<Applied, TransitionError> {
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;

        let mut applied = Applied::default();
        for effect in result.effects {
            match effect {
                Effect::AppendMessage(message) => self.transcript.append(message),
                Effect::ResetTranscript(seed) => {
                    self.transcript.reset(seed);
                    tracing::info!("Conversation reset");
                }
                Effect::RequestCompletion { generation } => {
                    debug_assert_eq!(self.transcript.last().map(|m| m.role), Some(Role::User));
                    self.last_generation = generation;
                    let request = CompletionRequest::new(self.transcript.snapshot());
                    tracing::debug!(
                        generation,
                        messages = self.transcript.len(),
                        "Issuing completion request"
                    );
                    applied.outbound = Some(Outbound {
                        generation,
                        request,
                    });
                }
                Effect::AbortRequest { generation } => {
                    tracing::info!(generation, "Abandoning in-flight request");
                    applied.aborted = Some(generation);
                }
            }
        }
        Ok(applied)
    }
}
