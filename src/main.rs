//! MyGPT - terminal chat client
//!
//! Keeps a conversation transcript, sends it to a completion endpoint on
//! every new turn, and prints the growing conversation.

mod config;
mod llm;
mod render;
mod runtime;
mod state_machine;
mod transcript;

use config::{ClientConfig, LogFormat};
use llm::{HttpCompletionService, LoggingService};
use runtime::{ChatSession, TurnController};
use state_machine::TurnContext;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    // stderr keeps log lines out of the transcript on stdout
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "mygpt=warn".into()),
    );

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let config = ClientConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        endpoint = %config.endpoint,
        timeout_secs = config.timeout.as_secs(),
        "Starting MyGPT client"
    );

    let client = Arc::new(LoggingService::new(HttpCompletionService::new(
        config.endpoint.clone(),
        config.timeout,
    )?));

    match client.inner().probe_health().await {
        Ok(()) => tracing::info!("Completion backend is healthy"),
        Err(e) => tracing::warn!(error = %e, "Completion backend health check failed"),
    }

    let controller = TurnController::new(TurnContext::default(), client);
    let session = ChatSession::new(controller);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    session.run(stdin, &mut stdout).await?;

    Ok(())
}
