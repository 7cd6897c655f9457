//! Text-completion client.
//!
//! A single request per user action: the caller builds a prompt, the client
//! posts it to the completions endpoint and hands back the first choice's
//! text verbatim. No retries, no client-side trimming, and the stop marker
//! is enforced by the endpoint, never reimplemented here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ApiError;
use crate::prompt;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "code-davinci-002";

/// Default generation token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters for one completion call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<u32>,
}

impl CompletionRequest {
    /// Request with the formalization defaults: default model, 150 tokens,
    /// temperature 0, generation stopped at the proof-body marker.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            stop: Some(prompt::STOP_MARKER.to_string()),
            logprobs: None,
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override or remove the stop sequence.
    pub fn with_stop(mut self, stop: Option<String>) -> Self {
        self.stop = stop;
        self
    }

    /// Ask the endpoint for per-token log-probabilities.
    pub fn with_logprobs(mut self, logprobs: u32) -> Self {
        self.logprobs = Some(logprobs);
        self
    }
}

/// Per-token log-probability data, as returned by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LogprobData {
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub token_logprobs: Vec<Option<f64>>,
    #[serde(default)]
    pub top_logprobs: Vec<HashMap<String, f64>>,
}

/// One generated continuation.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text of the first choice, verbatim.
    pub text: String,
    /// Endpoint-assigned response id, when present. Used to rate responses.
    pub response_id: Option<String>,
    /// Log-probability data, when requested.
    pub logprobs: Option<LogprobData>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
    #[serde(default)]
    logprobs: Option<LogprobData>,
}

/// Interface for sending a prompt and receiving the generated continuation.
///
/// Implementors encapsulate transport and vendor-specific details; the
/// conversation engine and the log-probability moderation strategy stay
/// decoupled from any particular provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue a single completion request and return the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ApiError>;
}

/// Reqwest-backed client for an OpenAI-style completions endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl OpenAiClient {
    /// Client against the default completions endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(api_key, crate::config::DEFAULT_COMPLETION_URL)
    }

    /// Client against a custom completions endpoint.
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ApiError> {
        tracing::debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            max_tokens = request.max_tokens,
            "sending completion request"
        );

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("completion request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Transport(format!(
                "completion endpoint returned status {}",
                response.status()
            )));
        }

        let payload: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(format!("completion body: {e}")))?;

        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::MalformedResponse("completion has no choices".to_string()))?;

        tracing::debug!(text_len = choice.text.len(), "completion received");

        Ok(Completion {
            text: choice.text,
            response_id: payload.id,
            logprobs: choice.logprobs,
        })
    }
}
