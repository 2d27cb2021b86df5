//! Client session state machine
//!
//! Elm Architecture: a single `SessionState` snapshot, replaced by the pure
//! `transition` function in response to user events and backend completions.

pub mod catalog;
mod effect;
pub mod errors;
mod event;
pub mod log;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use catalog::{AppId, CatalogItem, ItemDetail};
pub use effect::Effect;
pub use errors::{ActionKind, ErrorChannel};
pub use event::Event;
pub use log::{ConversationLog, MessageEntry, Sender};
pub use state::{RequestToken, SessionContext, SessionState, StalePolicy};
pub use transition::{transition, TransitionError, TransitionResult};
