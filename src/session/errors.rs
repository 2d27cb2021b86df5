//! Single-slot user-visible error banner

use serde::Serialize;
use std::fmt;

/// User actions that can fail remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Search,
    Select,
    SendMessage,
    MoreEvidence,
}

impl ActionKind {
    /// Banner prefix naming the failed operation
    #[must_use]
    pub fn failure_prefix(self) -> &'static str {
        match self {
            ActionKind::Search => "Search failed: ",
            ActionKind::Select => "Failed to fetch app details: ",
            ActionKind::SendMessage => "Failed to send message: ",
            ActionKind::MoreEvidence => "Failed to get additional reviews: ",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Search => "search",
            ActionKind::Select => "select",
            ActionKind::SendMessage => "send_message",
            ActionKind::MoreEvidence => "more_evidence",
        };
        f.write_str(name)
    }
}

/// Holds at most one error. Never expires on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorChannel {
    message: Option<String>,
}

impl ErrorChannel {
    pub fn clear(&mut self) {
        self.message = None;
    }

    /// Replace whatever is showing with a failure of `action`
    pub fn surface(&mut self, action: ActionKind, message: &impl fmt::Display) {
        self.message = Some(format!("{}{message}", action.failure_prefix()));
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.message.is_none()
    }
}
