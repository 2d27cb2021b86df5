//! Runtime for executing a session
//!
//! Owns the single session state, feeds events through the pure transition
//! function and performs the resulting remote calls.

mod executor;
pub mod traits;


pub use executor::{SessionClosed, SessionHandle, SessionRuntime};
pub use traits::CatalogBackend;

use crate::session::SessionState;
use std::sync::Arc;

/// Updates sent to the front end
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// State changed; re-render from this snapshot
    Snapshot(Arc<SessionState>),
    /// A user event was refused without changing state
    Rejected { reason: String },
}
