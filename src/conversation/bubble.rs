//! Bubble types: one message/turn in the chat history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Assistant,
    Human,
}

/// What a bubble's text contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BubbleKind {
    NaturalLanguage,
    FormalCode,
}

/// A single turn in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
    /// Stable key for hosts rendering the history.
    #[serde(default = "new_bubble_id")]
    pub id: String,
    pub user: Speaker,
    pub kind: BubbleKind,
    pub text: String,
    /// Endpoint-assigned id, present only for assistant bubbles that can be
    /// rated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn new_bubble_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Bubble {
    /// A human turn holding a natural-language statement.
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            id: new_bubble_id(),
            user: Speaker::Human,
            kind: BubbleKind::NaturalLanguage,
            text: text.into(),
            response_id: None,
            created_at: Utc::now(),
        }
    }

    /// An assistant turn holding a formal statement.
    pub fn assistant(text: impl Into<String>, response_id: Option<String>) -> Self {
        Self {
            id: new_bubble_id(),
            user: Speaker::Assistant,
            kind: BubbleKind::FormalCode,
            text: text.into(),
            response_id,
            created_at: Utc::now(),
        }
    }

    /// Whether this bubble holds formal code.
    pub fn is_formal(&self) -> bool {
        self.kind == BubbleKind::FormalCode
    }

    /// Whether this bubble can be rated.
    pub fn is_ratable(&self) -> bool {
        self.response_id.is_some()
    }
}
