//! Events that drive the session

use super::catalog::{AppId, CatalogItem, ItemDetail};
use super::errors::ActionKind;
use super::state::RequestToken;
use crate::backend::{BackendError, MessageAnswer};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    QueryEdited {
        text: String,
    },
    DraftEdited {
        text: String,
    },
    SearchSubmitted,
    ItemClicked {
        app_id: AppId,
    },
    MessageSubmitted,
    /// "Request more evidence" on transcript entry `entry` (0-based)
    EvidenceRequested {
        entry: usize,
    },

    // Backend completions
    SearchResolved {
        token: RequestToken,
        result: Result<Vec<CatalogItem>, BackendError>,
    },
    DetailResolved {
        token: RequestToken,
        result: Result<ItemDetail, BackendError>,
    },
    AnswerResolved {
        token: RequestToken,
        result: Result<MessageAnswer, BackendError>,
    },
    /// First half of an evidence request settled
    EvidenceBroadened {
        token: RequestToken,
        query: String,
        result: Result<(), BackendError>,
    },
    /// Second half of an evidence request settled
    EvidenceAnswerResolved {
        token: RequestToken,
        result: Result<MessageAnswer, BackendError>,
    },
}

impl Event {
    /// Whether this event settles a remote call
    #[must_use]
    pub fn is_completion(&self) -> bool {
        self.completion_kind().is_some()
    }

    /// Action kind of the remote call this event settles
    #[must_use]
    pub fn completion_kind(&self) -> Option<ActionKind> {
        match self {
            Event::SearchResolved { .. } => Some(ActionKind::Search),
            Event::DetailResolved { .. } => Some(ActionKind::Select),
            Event::AnswerResolved { .. } => Some(ActionKind::SendMessage),
            Event::EvidenceBroadened { .. } | Event::EvidenceAnswerResolved { .. } => {
                Some(ActionKind::MoreEvidence)
            }
            Event::QueryEdited { .. }
            | Event::DraftEdited { .. }
            | Event::SearchSubmitted
            | Event::ItemClicked { .. }
            | Event::MessageSubmitted
            | Event::EvidenceRequested { .. } => None,
        }
    }
}
