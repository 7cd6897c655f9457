//! Injected host configuration.
//!
//! The host panel owns authentication and endpoint discovery; at startup it
//! hands the core a single [`ChatConfig`] value, deserialized from the JSON
//! object the host injects into the webview. Components receive the pieces
//! they need explicitly instead of reading an ambient global.
//!
//! The API credential is deliberately not serializable and is redacted from
//! `Debug` output, so it cannot leak through logs or persisted state.

use serde::Deserialize;
use std::fmt;

/// Default base URL of the text-completion endpoint.
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/completions";

/// Default base URL of the moderation endpoint.
pub const DEFAULT_MODERATION_URL: &str = "https://api.openai.com/v1/moderations";

/// Host authentication session forwarded to the chat backend.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Opaque session identifier.
    pub id: String,
    /// Display label of the signed-in account, when the host provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_label: Option<String>,
}

impl SessionInfo {
    /// Create a session with just an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account_label: None,
        }
    }
}

/// Read-only configuration injected by the host at startup.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    /// API credential. Never persisted or logged by the core.
    pub api_key: String,

    /// Display image shown next to assistant bubbles.
    #[serde(default)]
    pub chat_image: String,

    /// Host auth session.
    pub session: SessionInfo,

    /// Base URL of the text-completion endpoint.
    #[serde(default = "default_completion_url")]
    pub completion_url: String,

    /// Base URL of the moderation endpoint.
    #[serde(default = "default_moderation_url")]
    pub moderation_url: String,

    /// Base URL of the chat backend (ratings, ping). Empty when the host
    /// runs without a backend.
    #[serde(default)]
    pub backend_url: String,
}

fn default_completion_url() -> String {
    DEFAULT_COMPLETION_URL.to_string()
}

fn default_moderation_url() -> String {
    DEFAULT_MODERATION_URL.to_string()
}

impl ChatConfig {
    /// Build a config from just a credential and a session, with default
    /// endpoints.
    pub fn new(api_key: impl Into<String>, session: SessionInfo) -> Self {
        Self {
            api_key: api_key.into(),
            chat_image: String::new(),
            session,
            completion_url: default_completion_url(),
            moderation_url: default_moderation_url(),
            backend_url: String::new(),
        }
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("chat_image", &self.chat_image)
            .field("session", &self.session)
            .field("completion_url", &self.completion_url)
            .field("moderation_url", &self.moderation_url)
            .field("backend_url", &self.backend_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_host_json() {
        let json = r#"{
            "apiKey": "sk-test",
            "chatImage": "media/codex.jpeg",
            "session": { "id": "abc123", "accountLabel": "octocat" }
        }"#;
        let config: ChatConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.chat_image, "media/codex.jpeg");
        assert_eq!(config.session.id, "abc123");
        assert_eq!(config.session.account_label.as_deref(), Some("octocat"));
        assert_eq!(config.completion_url, DEFAULT_COMPLETION_URL);
        assert_eq!(config.moderation_url, DEFAULT_MODERATION_URL);
        assert_eq!(config.backend_url, "");
    }

    #[test]
    fn test_config_endpoint_overrides() {
        let json = r#"{
            "apiKey": "sk-test",
            "session": { "id": "abc123" },
            "completionUrl": "http://localhost:9000/complete",
            "backendUrl": "http://localhost:9000/chat"
        }"#;
        let config: ChatConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.completion_url, "http://localhost:9000/complete");
        assert_eq!(config.backend_url, "http://localhost:9000/chat");
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ChatConfig::new("sk-very-secret", SessionInfo::new("s1"));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
