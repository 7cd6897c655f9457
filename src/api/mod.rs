//! Backend wire protocol.
//!
//! The chat backend accepts one POST shape for everything, discriminated by
//! `kind`: `chat` submits the history plus new input and answers with the
//! next bubble, `ping` is a liveness probe, and `rating` records feedback
//! for a generated response. [`BackendClient`] speaks this protocol and is
//! the production [`FeedbackClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{ChatConfig, SessionInfo};
use crate::conversation::Bubble;
use crate::error::ApiError;
use crate::feedback::{FeedbackClient, Rating};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Discriminator for backend requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Chat,
    Ping,
    Rating,
}

/// One request to the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub session: SessionInfo,
    pub kind: RequestKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bubbles: Option<Vec<Bubble>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl ApiRequest {
    /// A chat turn: full history plus the new input.
    pub fn chat(session: SessionInfo, bubbles: Vec<Bubble>, input_text: impl Into<String>) -> Self {
        Self {
            session,
            kind: RequestKind::Chat,
            bubbles: Some(bubbles),
            input_text: Some(input_text.into()),
            val: None,
            response_id: None,
        }
    }

    /// A liveness probe.
    pub fn ping(session: SessionInfo) -> Self {
        Self {
            session,
            kind: RequestKind::Ping,
            bubbles: None,
            input_text: None,
            val: None,
            response_id: None,
        }
    }

    /// A rating for a generated response.
    pub fn rating(session: SessionInfo, response_id: impl Into<String>, val: Rating) -> Self {
        Self {
            session,
            kind: RequestKind::Rating,
            bubbles: None,
            input_text: None,
            val: Some(val),
            response_id: Some(response_id.into()),
        }
    }
}

/// Answer to a `chat` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub new_bubble: Bubble,
}

/// Answer to a `rating` request.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingResponse {
    pub message: String,
}

/// Reqwest-backed client for the chat backend.
pub struct BackendClient {
    http: reqwest::Client,
    url: String,
    session: SessionInfo,
}

impl BackendClient {
    /// Client for the backend named in the injected configuration.
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_url(config.backend_url.clone(), config.session.clone())
    }

    /// Client against an explicit backend URL.
    pub fn with_url(url: impl Into<String>, session: SessionInfo) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            session,
        }
    }

    async fn post(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(kind = ?request.kind, "sending backend request");

        let response = self
            .http
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("backend request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Transport(format!(
                "backend returned status {}",
                response.status()
            )));
        }
        Ok(response)
    }

    /// Submit the history plus new input; the backend answers with the next
    /// bubble.
    pub async fn chat(
        &self,
        bubbles: Vec<Bubble>,
        input_text: impl Into<String>,
    ) -> Result<Bubble, ApiError> {
        let request = ApiRequest::chat(self.session.clone(), bubbles, input_text);
        let payload: ChatResponse = self
            .post(&request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(format!("chat body: {e}")))?;
        Ok(payload.new_bubble)
    }

    /// Probe the backend; returns its answer verbatim.
    pub async fn ping(&self) -> Result<serde_json::Value, ApiError> {
        let request = ApiRequest::ping(self.session.clone());
        self.post(&request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(format!("ping body: {e}")))
    }
}

#[async_trait]
impl FeedbackClient for BackendClient {
    async fn submit_rating(&self, response_id: &str, rating: Rating) -> Result<String, ApiError> {
        let request = ApiRequest::rating(self.session.clone(), response_id, rating);
        let payload: RatingResponse = self
            .post(&request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(format!("rating body: {e}")))?;
        Ok(payload.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionInfo {
        SessionInfo::new("sess-1")
    }

    // =========================================================================
    // Request shapes
    // =========================================================================

    #[test]
    fn test_chat_request_shape() {
        let bubbles = vec![Bubble::human("a statement")];
        let request = ApiRequest::chat(session(), bubbles, "try again");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["kind"], "chat");
        assert_eq!(json["session"]["id"], "sess-1");
        assert_eq!(json["inputText"], "try again");
        assert_eq!(json["bubbles"][0]["user"], "human");
        assert!(json.get("val").is_none());
        assert!(json.get("responseId").is_none());
    }

    #[test]
    fn test_ping_request_shape() {
        let json = serde_json::to_value(ApiRequest::ping(session())).unwrap();
        assert_eq!(json["kind"], "ping");
        assert!(json.get("bubbles").is_none());
        assert!(json.get("inputText").is_none());
    }

    #[test]
    fn test_rating_request_shape() {
        let request = ApiRequest::rating(session(), "cmpl-5", Rating::Down);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["kind"], "rating");
        assert_eq!(json["responseId"], "cmpl-5");
        assert_eq!(json["val"], -1);
        assert!(json.get("bubbles").is_none());
    }

    // =========================================================================
    // Response shapes
    // =========================================================================

    #[test]
    fn test_chat_response_parses_new_bubble() {
        let body = r#"{
            "newBubble": { "user": "assistant", "kind": "formal-code",
                           "text": "theorem x :=", "responseId": "cmpl-2" }
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.new_bubble.text, "theorem x :=");
        assert_eq!(parsed.new_bubble.response_id.as_deref(), Some("cmpl-2"));
    }

    #[test]
    fn test_rating_response_parses_message() {
        let parsed: RatingResponse =
            serde_json::from_str(r#"{ "message": "thanks!" }"#).unwrap();
        assert_eq!(parsed.message, "thanks!");
    }
}
