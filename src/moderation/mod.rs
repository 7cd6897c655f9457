//! Response moderation.
//!
//! Two interchangeable strategies classify a generated response as safe or
//! unsafe before it reaches the conversation:
//!
//! - [`LogprobModeration`] sends the text to a single-token classifier and
//!   reads back the predicted label with its log-probability.
//! - [`FlagModeration`] asks a moderation endpoint and trusts the boolean
//!   `flagged` field of the first result.
//!
//! A filter reports classification trouble as an error; the conversation
//! engine treats any such error as unsafe (fail-closed).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::completion::{CompletionClient, CompletionRequest};
use crate::error::ApiError;

/// Model used by the log-probability strategy.
pub const CLASSIFIER_MODEL: &str = "content-filter-alpha";

/// Label the classifier emits for unsafe content.
const UNSAFE_LABEL: &str = "2";

/// An unsafe verdict below this log-probability is not confident enough to
/// act on; the content passes.
pub const UNSAFE_LOGPROB_THRESHOLD: f64 = -0.355;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability: classify text as safe or unsafe.
#[async_trait]
pub trait ModerationFilter: Send + Sync {
    /// `Ok(true)` when the text may be shown. Errors mean the classification
    /// itself failed; callers decide the failure policy.
    async fn is_safe(&self, text: &str) -> Result<bool, ApiError>;
}

/// Classify via a single-token completion and its log-probability.
pub struct LogprobModeration {
    client: Arc<dyn CompletionClient>,
}

impl LogprobModeration {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    fn classification_request(text: &str) -> CompletionRequest {
        CompletionRequest::new(format!("<|endoftext|>{text}\n--\nLabel:"))
            .with_model(CLASSIFIER_MODEL)
            .with_max_tokens(1)
            .with_temperature(0.0)
            .with_stop(None)
            .with_logprobs(10)
    }
}

#[async_trait]
impl ModerationFilter for LogprobModeration {
    async fn is_safe(&self, text: &str) -> Result<bool, ApiError> {
        let completion = self
            .client
            .complete(&Self::classification_request(text))
            .await?;

        let label = completion.text.trim();
        if label != UNSAFE_LABEL {
            return Ok(true);
        }

        // Predicted unsafe: act on it only when the classifier is confident.
        // Missing confidence data counts as confident.
        let logprob = completion
            .logprobs
            .as_ref()
            .and_then(|lp| lp.top_logprobs.first())
            .and_then(|top| top.get(UNSAFE_LABEL))
            .copied();

        match logprob {
            Some(lp) => {
                tracing::debug!(logprob = lp, "classifier predicted unsafe");
                Ok(lp < UNSAFE_LOGPROB_THRESHOLD)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
}

/// Classify via a moderation endpoint's boolean `flagged` field.
pub struct FlagModeration {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl FlagModeration {
    /// Client against the default moderation endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(api_key, crate::config::DEFAULT_MODERATION_URL)
    }

    /// Client against a custom moderation endpoint.
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ModerationFilter for FlagModeration {
    async fn is_safe(&self, text: &str) -> Result<bool, ApiError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&ModerationRequest { input: text })
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("moderation request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Transport(format!(
                "moderation endpoint returned status {}",
                response.status()
            )));
        }

        let payload: ModerationResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(format!("moderation body: {e}")))?;

        let first = payload
            .results
            .first()
            .ok_or_else(|| ApiError::MalformedResponse("moderation has no results".to_string()))?;

        Ok(!first.flagged)
    }
}
