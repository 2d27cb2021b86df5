//! Session state snapshot and immutable session configuration

use super::catalog::{CatalogItem, ItemDetail};
use super::errors::{ActionKind, ErrorChannel};
use super::log::ConversationLog;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Request tokens
// ============================================================================

/// Identifies one issued remote call within its action kind
pub type RequestToken = u64;

/// Latest token issued per action kind. Tokens start at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestTokens {
    search: RequestToken,
    select: RequestToken,
    send_message: RequestToken,
    more_evidence: RequestToken,
}

impl RequestTokens {
    fn slot(&mut self, kind: ActionKind) -> &mut RequestToken {
        match kind {
            ActionKind::Search => &mut self.search,
            ActionKind::Select => &mut self.select,
            ActionKind::SendMessage => &mut self.send_message,
            ActionKind::MoreEvidence => &mut self.more_evidence,
        }
    }

    /// Issue the next token for `kind`
    pub fn issue(&mut self, kind: ActionKind) -> RequestToken {
        let slot = self.slot(kind);
        *slot += 1;
        *slot
    }

    #[must_use]
    pub fn latest(&self, kind: ActionKind) -> RequestToken {
        match kind {
            ActionKind::Search => self.search,
            ActionKind::Select => self.select,
            ActionKind::SendMessage => self.send_message,
            ActionKind::MoreEvidence => self.more_evidence,
        }
    }
}

// ============================================================================
// Session state
// ============================================================================

/// Everything the user sees. Replaced wholesale by each transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub(crate) search_query: String,
    /// Replaced on every successful search
    pub(crate) results: Vec<CatalogItem>,
    /// Replaced on every successful selection
    pub(crate) selected: Option<ItemDetail>,
    pub(crate) log: ConversationLog,
    pub(crate) draft: String,
    /// Most recent user-authored message, reused by evidence requests
    pub(crate) last_user_query: Option<String>,
    pub(crate) error: ErrorChannel,
    pub(crate) tokens: RequestTokens,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub fn results(&self) -> &[CatalogItem] {
        &self.results
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ItemDetail> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn last_user_query(&self) -> Option<&str> {
        self.last_user_query.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.message()
    }

    #[must_use]
    pub fn tokens(&self) -> &RequestTokens {
        &self.tokens
    }
}

// ============================================================================
// Session context
// ============================================================================

/// How completions of superseded requests are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Every completion is applied; the last one to resolve wins
    #[default]
    LastResolvedWins,
    /// Completions for anything but the latest issued request of their kind are dropped
    LatestIssuedWins,
}

#[derive(Debug, Error)]
#[error("Unknown stale policy '{0}' (expected 'last-resolved' or 'latest-issued')")]
pub struct ParseStalePolicyError(String);

impl FromStr for StalePolicy {
    type Err = ParseStalePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-resolved" => Ok(StalePolicy::LastResolvedWins),
            "latest-issued" => Ok(StalePolicy::LatestIssuedWins),
            other => Err(ParseStalePolicyError(other.to_string())),
        }
    }
}

/// Immutable configuration of one session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub stale_policy: StalePolicy,
}

impl SessionContext {
    #[must_use]
    pub fn new(session_id: impl Into<String>, stale_policy: StalePolicy) -> Self {
        Self {
            session_id: session_id.into(),
            stale_policy,
        }
    }

    /// Whether a completion carrying `token` should still be applied
    #[must_use]
    pub fn accepts(&self, state: &SessionState, kind: ActionKind, token: RequestToken) -> bool {
        match self.stale_policy {
            StalePolicy::LastResolvedWins => true,
            StalePolicy::LatestIssuedWins => state.tokens.latest(kind) == token,
        }
    }
}
