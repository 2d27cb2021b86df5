//! Conversation transcript

use serde::{Deserialize, Serialize};

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    System,
}

/// One transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntry {
    text: String,
    sender: Sender,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence: Option<String>,
}

impl MessageEntry {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            evidence: None,
        }
    }

    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::System,
            evidence: None,
        }
    }

    /// System answer grounded by an evidence excerpt
    #[must_use]
    pub fn system_with_evidence(text: impl Into<String>, evidence: Option<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::System,
            evidence: evidence.filter(|e| !e.is_empty()),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Only ever present on system entries
    #[must_use]
    pub fn evidence(&self) -> Option<&str> {
        self.evidence.as_deref()
    }

    /// Whether the "request more evidence" affordance applies to this entry
    #[must_use]
    pub fn accepts_more_evidence(&self) -> bool {
        self.sender == Sender::System && self.evidence.is_none()
    }
}

/// Append-only sequence of transcript entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversationLog {
    entries: Vec<MessageEntry>,
}

impl ConversationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MessageEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MessageEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the newest entry that still accepts more evidence
    #[must_use]
    pub fn latest_evidence_target(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(MessageEntry::accepts_more_evidence)
    }
}
