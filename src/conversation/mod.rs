//! Conversation state machine and the engine driving it.
//!
//! ## Submodules
//! - `bubble`: message/turn types
//! - `state`: ordered bubble history and its transitions
//! - `engine`: async request/response cycle over the injected clients

mod bubble;
mod engine;
mod state;

pub use bubble::{Bubble, BubbleKind, Speaker};
pub use engine::ChatEngine;
pub use state::{Conversation, SubmissionTicket, UNSAFE_OUTPUT_ERROR};
