//! Review Chat - terminal client
//!
//! Reads commands from stdin, renders every session snapshot to stdout and
//! writes JSON logs to stderr.

use review_chat::backend::{missing_credentials, HttpBackend, LoggingBackend};
use review_chat::command::{self, Command};
use review_chat::config::ClientConfig;
use review_chat::render::render;
use review_chat::runtime::{SessionRuntime, SessionUpdate};
use review_chat::session::{SessionContext, SessionState};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "Commands: /search <query>, /select <n|#id>, /more [n], /quit. Anything else is sent to the assistant.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "review_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        timeout_secs = config.request_timeout.as_secs(),
        stale_policy = ?config.stale_policy,
        "Configuration loaded"
    );

    let http = HttpBackend::new(&config.api_base_url, config.request_timeout)?;
    let backend = LoggingBackend::new(Arc::new(http));

    match missing_credentials(&backend).await {
        Ok(missing) if missing.is_empty() => tracing::info!("All backend credentials configured"),
        Ok(missing) => tracing::warn!(?missing, "Backend is missing credentials"),
        Err(e) => tracing::warn!(error = %e, "Could not check backend credentials"),
    }

    let context = SessionContext::new(uuid::Uuid::new_v4().to_string(), config.stale_policy);
    let (runtime, handle) = SessionRuntime::new(context, backend);
    let mut updates = handle.subscribe();
    let session = runtime.spawn();

    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest = Arc::new(SessionState::new());

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(SessionUpdate::Snapshot(state)) => {
                    print!("{}", render(&state));
                    println!("--");
                    latest = state;
                }
                Ok(SessionUpdate::Rejected { reason }) => println!("(ignored: {reason})"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Render fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}. {HELP}");
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }
                match command.into_events(&latest) {
                    Ok(events) => {
                        for event in events {
                            handle.send(event).await?;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    drop(handle);
    session.abort();
    Ok(())
}
