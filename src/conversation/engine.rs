//! Drives the request/response cycle over an owned conversation.
//!
//! The engine is the error boundary: everything raised during a submission
//! is converted to a single human-readable message on the conversation and
//! never propagates to the host. Completion and moderation run strictly
//! sequentially within one submission, and a moderation failure is treated
//! as an unsafe verdict (fail-closed) rather than a transport error.

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::completion::{CompletionClient, CompletionRequest};
use crate::conversation::state::Conversation;
use crate::error::ApiError;
use crate::feedback::{FeedbackClient, Rating};
use crate::moderation::ModerationFilter;
use crate::prompt;

/// Owns a [`Conversation`] and the injected clients that serve it.
pub struct ChatEngine {
    conversation: Conversation,
    completion: Arc<dyn CompletionClient>,
    moderation: Arc<dyn ModerationFilter>,
    feedback: Arc<dyn FeedbackClient>,
    model: Option<String>,
}

impl ChatEngine {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        moderation: Arc<dyn ModerationFilter>,
        feedback: Arc<dyn FeedbackClient>,
    ) -> Self {
        Self {
            conversation: Conversation::new(),
            completion,
            moderation,
            feedback,
            model: None,
        }
    }

    /// Override the completion model for subsequent submissions.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The conversation being driven.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Replace the unsent input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.conversation.set_input_buffer(text);
    }

    /// Remove the most recently appended bubble.
    pub fn clear_one(&mut self) {
        self.conversation.clear_one();
    }

    /// Empty the conversation.
    pub fn clear_all(&mut self) {
        self.conversation.clear_all();
    }

    /// Submit a statement and run the full cycle: prompt, completion,
    /// moderation, append. A submission while another is in flight is a
    /// no-op.
    pub async fn submit(&mut self, text: impl Into<String>) {
        let Some(ticket) = self.conversation.begin_submission(text) else {
            return;
        };

        let prompt_text = if ticket.is_first_turn {
            prompt::initial_prompt(&ticket.statement)
        } else {
            prompt::followup_prompt(&ticket.statement, &ticket.prompt_context)
        };

        let mut request = CompletionRequest::new(prompt_text);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let completion = match self.completion.complete(&request).await {
            Ok(completion) => completion,
            Err(err) => {
                error!(error = %err, "completion request failed");
                self.conversation
                    .fail_submission(ticket.generation, err.to_string());
                return;
            }
        };

        // Moderation runs after completion; a classification failure is an
        // unsafe verdict, so unmoderated content never reaches the history.
        let safe = match self.moderation.is_safe(&completion.text).await {
            Ok(safe) => safe,
            Err(err) => {
                warn!(error = %err, "moderation unavailable, suppressing output");
                false
            }
        };

        if safe {
            debug!(generation = ticket.generation, "appending formal statement");
            self.conversation.complete_submission(
                ticket.generation,
                &completion.text,
                completion.response_id,
            );
        } else {
            self.conversation.reject_submission(ticket.generation);
        }
    }

    /// Rate the bubble with the given id.
    ///
    /// Returns `Ok(None)` without touching the feedback client when the
    /// bubble does not exist or cannot be rated (no response id); otherwise
    /// returns the server's acknowledgment.
    pub async fn rate(&self, bubble_id: &str, rating: Rating) -> Result<Option<String>, ApiError> {
        let Some(bubble) = self.conversation.bubble(bubble_id) else {
            debug!(bubble_id, "rating skipped, no such bubble");
            return Ok(None);
        };
        let Some(response_id) = bubble.response_id.as_deref() else {
            debug!(bubble_id, "rating skipped, bubble has no response id");
            return Ok(None);
        };

        let ack = self.feedback.submit_rating(response_id, rating).await?;
        debug!(response_id, value = rating.value(), "rating submitted");
        Ok(Some(ack))
    }
}
