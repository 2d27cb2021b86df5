//! Backend error types

use thiserror::Error;

/// Failure of a remote catalog operation. Displays as the bare message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
}

impl BackendError {
    #[must_use]
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Timeout, message)
    }

    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Connect, message)
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Transport, message)
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Rejected, message)
    }

    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Decode, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Request exceeded the configured timeout
    Timeout,
    /// Backend unreachable
    Connect,
    /// Other transport failure
    Transport,
    /// Backend answered with an error status or a non-success `status` field
    Rejected,
    /// Response body did not match the expected shape
    Decode,
}

impl BackendErrorKind {
    /// Whether the request never produced a response
    #[must_use]
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Timeout | Self::Connect | Self::Transport)
    }
}
