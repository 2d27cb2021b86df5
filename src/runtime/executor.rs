//! Session runtime executor

use super::traits::CatalogBackend;
use super::SessionUpdate;
use crate::session::{
    transition, Effect, Event, SessionContext, SessionState, TransitionError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const UPDATE_CHANNEL_CAPACITY: usize = 128;

/// The session runtime has shut down
#[derive(Debug, Error)]
#[error("Session runtime is no longer running")]
pub struct SessionClosed;

/// Handle for feeding events to a running session and watching its state
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    /// Queue an event for the session.
    ///
    /// # Errors
    ///
    /// Fails once the session runtime has stopped.
    pub async fn send(&self, event: Event) -> Result<(), SessionClosed> {
        self.event_tx.send(event).await.map_err(|_| SessionClosed)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }
}

/// Generic session runtime that works with any backend implementation.
///
/// Events are processed one at a time. Remote calls run as separate tasks
/// and report back through the event channel, so other events keep flowing
/// while calls are pending. The loop ends once every handle is dropped and
/// no call is in flight.
pub struct SessionRuntime<B>
where
    B: CatalogBackend + 'static,
{
    context: SessionContext,
    state: Arc<SessionState>,
    backend: Arc<B>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so that dropping all handles can end the loop
    event_tx: mpsc::WeakSender<Event>,
    update_tx: broadcast::Sender<SessionUpdate>,
    /// Remote calls issued but not yet settled
    in_flight: usize,
}

impl<B> SessionRuntime<B>
where
    B: CatalogBackend + 'static,
{
    #[must_use]
    pub fn new(context: SessionContext, backend: B) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        let runtime = Self {
            context,
            state: Arc::new(SessionState::new()),
            backend: Arc::new(backend),
            event_rx,
            event_tx: event_tx.downgrade(),
            update_tx: update_tx.clone(),
            in_flight: 0,
        };
        let handle = SessionHandle {
            event_tx,
            update_tx,
        };
        (runtime, handle)
    }

    /// Start the event loop as a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.process_event(event) {
                tracing::warn!(
                    session_id = %self.context.session_id,
                    error = %e,
                    "Event refused"
                );
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    /// Receive the next queued event
    #[cfg(test)]
    pub(crate) async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    /// Apply one event and start whatever remote calls it produces
    ///
    /// # Errors
    ///
    /// Returns the refusal when the transition rejects the event; state is
    /// left unchanged and a `Rejected` update is broadcast.
    pub fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        if event.is_completion() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                let _ = self.update_tx.send(SessionUpdate::Rejected {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        if result.new_state != *self.state {
            self.state = Arc::new(result.new_state);
            // No subscribers is fine
            let _ = self
                .update_tx
                .send(SessionUpdate::Snapshot(Arc::clone(&self.state)));
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        let Some(event_tx) = self.event_tx.upgrade() else {
            tracing::debug!(action = %effect.kind(), "Session closing, dropping request");
            return;
        };

        tracing::info!(
            session_id = %self.context.session_id,
            action = %effect.kind(),
            token = effect.token(),
            "Issuing backend request"
        );

        self.in_flight += 1;
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let event = perform(backend.as_ref(), effect).await;
            if event_tx.send(event).await.is_err() {
                tracing::debug!("Session stopped before completion was delivered");
            }
        });
    }
}

/// Run one remote call and turn its outcome into a completion event
async fn perform<B: CatalogBackend + ?Sized>(backend: &B, effect: Effect) -> Event {
    match effect {
        Effect::Search { token, query } => Event::SearchResolved {
            token,
            result: backend.search(&query).await,
        },
        Effect::FetchDetail { token, app_id } => Event::DetailResolved {
            token,
            result: backend.find(app_id).await,
        },
        Effect::SendMessage { token, text } => Event::AnswerResolved {
            token,
            result: backend.message(&text).await,
        },
        Effect::BroadenEvidence { token, query } => {
            let result = backend.additional_reviews(&query).await;
            Event::EvidenceBroadened {
                token,
                query,
                result,
            }
        }
        Effect::ResendForEvidence { token, query } => Event::EvidenceAnswerResolved {
            token,
            result: backend.message(&query).await,
        },
    }
}
