//! Pure state transition function
//!
//! Given the same state, context and event, `transition` always produces the
//! same new state and effects. No I/O happens here; remote calls are returned
//! as effects and their outcomes come back as completion events.

use super::catalog::ItemDetail;
use super::errors::ActionKind;
use super::log::MessageEntry;
use super::state::RequestToken;
use super::{Effect, Event, SessionContext, SessionState};
use crate::backend::{BackendError, MessageAnswer};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Whether the event changed nothing
    #[must_use]
    pub fn is_noop(&self, previous: &SessionState) -> bool {
        self.effects.is_empty() && &self.new_state == previous
    }
}

/// Reasons an evidence request is refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No transcript entry at position {0}")]
    NoSuchEntry(usize),
    #[error("Entry {0} is a user message")]
    NotAnAnswer(usize),
    #[error("Entry {0} already shows a review")]
    EvidenceAlreadyShown(usize),
}

/// Pure transition function
///
/// # Errors
///
/// Evidence requests for entries that cannot take more evidence.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Input editing
        // ============================================================
        Event::QueryEdited { text } => {
            let mut next = state.clone();
            next.search_query = text;
            Ok(TransitionResult::new(next))
        }

        Event::DraftEdited { text } => {
            let mut next = state.clone();
            next.draft = text;
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // User actions
        // ============================================================

        // Empty queries are forwarded; validation belongs to the backend
        Event::SearchSubmitted => {
            let mut next = state.clone();
            next.error.clear();
            let token = next.tokens.issue(ActionKind::Search);
            let query = next.search_query.clone();
            Ok(TransitionResult::new(next).with_effect(Effect::Search { token, query }))
        }

        Event::ItemClicked { app_id } => {
            let mut next = state.clone();
            next.error.clear();
            let token = next.tokens.issue(ActionKind::Select);
            Ok(TransitionResult::new(next).with_effect(Effect::FetchDetail { token, app_id }))
        }

        // Blank drafts are a silent no-op: no call, no log entry, banner untouched
        Event::MessageSubmitted if state.draft.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        Event::MessageSubmitted => {
            let mut next = state.clone();
            next.error.clear();
            let text = next.draft.clone();
            next.last_user_query = Some(text.clone());
            // Local echo, never rolled back
            next.log.push(MessageEntry::user(text.clone()));
            let token = next.tokens.issue(ActionKind::SendMessage);
            Ok(TransitionResult::new(next).with_effect(Effect::SendMessage { token, text }))
        }

        Event::EvidenceRequested { entry } => {
            let target = state
                .log
                .get(entry)
                .ok_or(TransitionError::NoSuchEntry(entry))?;
            if target.evidence().is_some() {
                return Err(TransitionError::EvidenceAlreadyShown(entry));
            }
            if !target.accepts_more_evidence() {
                return Err(TransitionError::NotAnAnswer(entry));
            }
            // Uses the latest question, not necessarily the one this entry answered.
            // Before any question this is empty and forwarded as-is.
            let query = state.last_user_query.clone().unwrap_or_default();

            let mut next = state.clone();
            next.error.clear();
            let token = next.tokens.issue(ActionKind::MoreEvidence);
            Ok(TransitionResult::new(next).with_effect(Effect::BroadenEvidence { token, query }))
        }

        // ============================================================
        // Backend completions
        // ============================================================
        Event::SearchResolved { token, result } => {
            if !context.accepts(state, ActionKind::Search, token) {
                return Ok(stale(state, ActionKind::Search, token));
            }
            let mut next = state.clone();
            match result {
                Ok(items) => next.results = items,
                Err(e) => next.error.surface(ActionKind::Search, &e),
            }
            Ok(TransitionResult::new(next))
        }

        Event::DetailResolved { token, result } => {
            if !context.accepts(state, ActionKind::Select, token) {
                return Ok(stale(state, ActionKind::Select, token));
            }
            let mut next = state.clone();
            match result {
                Ok(detail) => apply_selection(&mut next, detail),
                Err(e) => next.error.surface(ActionKind::Select, &e),
            }
            Ok(TransitionResult::new(next))
        }

        Event::AnswerResolved { token, result } => {
            if !context.accepts(state, ActionKind::SendMessage, token) {
                return Ok(stale(state, ActionKind::SendMessage, token));
            }
            let mut next = state.clone();
            match result {
                Ok(answer) => {
                    next.log.push(answer_entry(answer));
                    next.draft.clear();
                }
                // Draft stays as typed and the echoed question stays in the log
                Err(e) => next.error.surface(ActionKind::SendMessage, &e),
            }
            Ok(TransitionResult::new(next))
        }

        Event::EvidenceBroadened {
            token,
            query,
            result,
        } => {
            if !context.accepts(state, ActionKind::MoreEvidence, token) {
                return Ok(stale(state, ActionKind::MoreEvidence, token));
            }
            match result {
                Ok(()) => Ok(TransitionResult::new(state.clone())
                    .with_effect(Effect::ResendForEvidence { token, query })),
                // Fail fast: the resend is never issued
                Err(e) => Ok(TransitionResult::new(evidence_failed(state, &e))),
            }
        }

        Event::EvidenceAnswerResolved { token, result } => {
            if !context.accepts(state, ActionKind::MoreEvidence, token) {
                return Ok(stale(state, ActionKind::MoreEvidence, token));
            }
            match result {
                Ok(answer) => {
                    let mut next = state.clone();
                    next.log.push(answer_entry(answer));
                    Ok(TransitionResult::new(next))
                }
                Err(e) => Ok(TransitionResult::new(evidence_failed(state, &e))),
            }
        }
    }
}

// Helper functions

fn apply_selection(state: &mut SessionState, detail: ItemDetail) {
    state
        .log
        .push(MessageEntry::system(detail.selection_message()));
    state.selected = Some(detail);
}

fn answer_entry(answer: MessageAnswer) -> MessageEntry {
    MessageEntry::system_with_evidence(answer.response, answer.review_text)
}

fn evidence_failed(state: &SessionState, error: &BackendError) -> SessionState {
    let mut next = state.clone();
    next.error.surface(ActionKind::MoreEvidence, error);
    next
}

fn stale(state: &SessionState, kind: ActionKind, token: RequestToken) -> TransitionResult {
    tracing::debug!(
        action = %kind,
        token,
        latest = state.tokens.latest(kind),
        "Discarding stale completion"
    );
    TransitionResult::new(state.clone())
}
