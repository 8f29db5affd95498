//! Interactive chat session
//!
//! Reads lines, drives the controller, and prints the conversation as it
//! grows. The single outstanding request runs as its own task and reports
//! back over a channel, so input stays live while a reply is pending.

use super::controller::{Outbound, Resolution, TurnController};
use crate::llm::{CompletionError, CompletionService};
use crate::render;
use crate::state_machine::TransitionError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

type Outcome = (u64, Result<String, CompletionError>);

/// A line of user input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewConversation,
    Quit,
    Submit(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/new" => Command::NewConversation,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Submit(line.to_string()),
        }
    }
}

struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

pub struct ChatSession<C: CompletionService + 'static> {
    controller: TurnController<C>,
    in_flight: Option<InFlight>,
    outcome_tx: mpsc::Sender<Outcome>,
    outcome_rx: mpsc::Receiver<Outcome>,
    /// Messages of the current transcript already printed
    rendered: usize,
}

impl<C: CompletionService + 'static> ChatSession<C> {
    pub fn new(controller: TurnController<C>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(4);
        Self {
            controller,
            in_flight: None,
            outcome_tx,
            outcome_rx,
            rendered: 0,
        }
    }

    /// Run until `/quit` or until input ends and no reply is outstanding
    pub async fn run<R, W>(mut self, input: R, output: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Starting chat session");
        output.write_all(render::header().as_bytes()).await?;
        self.render_updates(output).await?;

        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            if !input_open && self.in_flight.is_none() {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            if self.handle_line(&line, output).await? == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            tracing::debug!("Input closed");
                            input_open = false;
                        }
                    }
                }
                Some((generation, outcome)) = self.outcome_rx.recv() => {
                    self.handle_outcome(generation, outcome, output).await?;
                }
                else => break,
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
        output.flush().await?;
        tracing::info!("Chat session stopped");
        Ok(())
    }

    async fn handle_line<W: AsyncWrite + Unpin>(
        &mut self,
        line: &str,
        output: &mut W,
    ) -> std::io::Result<Flow> {
        match Command::parse(line) {
            Command::Quit => return Ok(Flow::Quit),
            Command::NewConversation => {
                if let Some(generation) = self.controller.new_conversation() {
                    self.cancel_in_flight(generation);
                }
                self.rendered = 0;
                output.write_all(render::new_chat_divider().as_bytes()).await?;
                self.render_updates(output).await?;
            }
            Command::Submit(text) => match self.controller.begin_submit(&text) {
                Ok(Some(outbound)) => {
                    self.spawn_request(outbound);
                    self.render_updates(output).await?;
                }
                Ok(None) => {}
                Err(TransitionError::Busy) => {
                    output.write_all(render::busy_notice().as_bytes()).await?;
                    output.flush().await?;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Submission rejected");
                }
            },
        }
        Ok(Flow::Continue)
    }

    async fn handle_outcome<W: AsyncWrite + Unpin>(
        &mut self,
        generation: u64,
        outcome: Result<String, CompletionError>,
        output: &mut W,
    ) -> std::io::Result<()> {
        if self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
        {
            self.in_flight = None;
        }

        if self.controller.resolve(generation, outcome) == Resolution::Applied {
            self.render_updates(output).await?;
        }
        Ok(())
    }

    fn spawn_request(&mut self, outbound: Outbound) {
        let generation = outbound.generation;
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let client = self.controller.client();
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(generation, "Request task cancelled");
                }
                outcome = outbound.send(&*client) => {
                    // Receiver gone means the session ended
                    let _ = outcome_tx.send(outcome).await;
                }
            }
        });

        self.in_flight = Some(InFlight { generation, cancel });
    }

    fn cancel_in_flight(&mut self, generation: u64) {
        if let Some(in_flight) = self.in_flight.take() {
            debug_assert_eq!(in_flight.generation, generation);
            in_flight.cancel.cancel();
        }
    }

    async fn render_updates<W: AsyncWrite + Unpin>(&mut self, output: &mut W) -> std::io::Result<()> {
        let view = self.controller.view();
        output
            .write_all(render::view_from(&view, self.rendered).as_bytes())
            .await?;
        output.flush().await?;
        self.rendered = view.messages.len();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}
