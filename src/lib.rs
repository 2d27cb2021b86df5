//! Review Chat - conversational search client for a review-backed catalog
//!
//! Search the catalog, open an item, chat with the assistant about it and ask
//! for more supporting reviews. The session is an immutable state machine
//! driven by a runtime that performs the remote calls.

pub mod backend;
pub mod command;
pub mod config;
pub mod render;
pub mod runtime;
pub mod session;
