//! Lean Chat core
//!
//! Library core of an editor-embedded chat assistant that turns informal
//! mathematical statements into formal Lean statements. The host panel owns
//! rendering, authentication, and editor access; this crate owns the
//! conversation, the prompt/completion/moderation pipeline, and the typed
//! messages crossing the host boundary.
//!
//! ## Main Components
//!
//! - [`prompt`] - Few-shot prompt construction (pure functions)
//! - [`completion`] - Text-completion client (`CompletionClient`, `OpenAiClient`)
//! - [`moderation`] - Safe/unsafe response classification, two strategies
//! - [`conversation`] - Bubble history, state machine, and `ChatEngine`
//! - [`feedback`] - Rating side-channel (`FeedbackClient`)
//! - [`api`] - Backend wire protocol (`BackendClient`: chat, ping, rating)
//! - [`bridge`] - Host-boundary messages (`insert_text`, `copy_text`)
//! - [`config`] - Host-injected configuration
//!
//! ## Quick Start
//!
//! ```ignore
//! use lean_chat_core::{ChatConfig, ChatEngine, OpenAiClient, FlagModeration, BackendClient};
//! use std::sync::Arc;
//!
//! let config: ChatConfig = serde_json::from_str(host_config_json)?;
//! let mut engine = ChatEngine::new(
//!     Arc::new(OpenAiClient::new(config.api_key.clone())),
//!     Arc::new(FlagModeration::new(config.api_key.clone())),
//!     Arc::new(BackendClient::new(&config)),
//! );
//! engine.submit("Show that $ab$ and $ba$ have the same order.").await;
//! ```

pub mod api;
pub mod bridge;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod moderation;
pub mod prompt;

// Re-export commonly used types
pub use api::{ApiRequest, BackendClient, ChatResponse, RatingResponse, RequestKind};
pub use bridge::{
    BridgeError, HostChannel, HostMessage, HostReceiver, InsertMode, InsertionBridge,
    MessageChannel, Position,
};
pub use completion::{Completion, CompletionClient, CompletionRequest, OpenAiClient};
pub use config::{ChatConfig, SessionInfo};
pub use conversation::{
    Bubble, BubbleKind, ChatEngine, Conversation, Speaker, SubmissionTicket, UNSAFE_OUTPUT_ERROR,
};
pub use error::ApiError;
pub use feedback::{FeedbackClient, Rating};
pub use logging::init_logging;
pub use moderation::{
    FlagModeration, LogprobModeration, ModerationFilter, UNSAFE_LOGPROB_THRESHOLD,
};
pub use prompt::{example_prompt, followup_prompt, initial_prompt};
