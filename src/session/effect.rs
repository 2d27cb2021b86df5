//! Remote calls produced by state transitions

use super::catalog::AppId;
use super::errors::ActionKind;
use super::state::RequestToken;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a catalog search
    Search { token: RequestToken, query: String },

    /// Fetch detail for a clicked item
    FetchDetail { token: RequestToken, app_id: AppId },

    /// Ask the assistant a question
    SendMessage { token: RequestToken, text: String },

    /// Have the backend widen its review pool for `query`
    BroadenEvidence { token: RequestToken, query: String },

    /// Ask `query` again after the pool was widened
    ResendForEvidence { token: RequestToken, query: String },
}

impl Effect {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Effect::Search { .. } => ActionKind::Search,
            Effect::FetchDetail { .. } => ActionKind::Select,
            Effect::SendMessage { .. } => ActionKind::SendMessage,
            Effect::BroadenEvidence { .. } | Effect::ResendForEvidence { .. } => {
                ActionKind::MoreEvidence
            }
        }
    }

    #[must_use]
    pub fn token(&self) -> RequestToken {
        match self {
            Effect::Search { token, .. }
            | Effect::FetchDetail { token, .. }
            | Effect::SendMessage { token, .. }
            | Effect::BroadenEvidence { token, .. }
            | Effect::ResendForEvidence { token, .. } => *token,
        }
    }
}
