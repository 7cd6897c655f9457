//! Conversation state and its transitions.
//!
//! The conversation is single-owner, single-writer: every mutation goes
//! through one of the transition methods here. Submissions are tagged with a
//! generation counter; results carrying a stale generation are discarded,
//! so a response that arrives after a clear cannot resurrect old state.

use crate::conversation::bubble::Bubble;
use crate::prompt;

/// Error shown when a generated response was suppressed by moderation.
pub const UNSAFE_OUTPUT_ERROR: &str =
    "The generated statement was flagged as unsafe and has been hidden. Please try again.";

/// Ticket handed out when a submission starts; carries everything the
/// request/response cycle needs without borrowing the conversation.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    /// Generation this submission belongs to.
    pub generation: u64,
    /// True when the conversation had no bubbles yet.
    pub is_first_turn: bool,
    /// Concatenated text of the bubbles that existed before this submission.
    pub prompt_context: String,
    /// The submitted statement, verbatim.
    pub statement: String,
}

/// Ordered bubble history plus the transient request-cycle flags.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    bubbles: Vec<Bubble>,
    pending: bool,
    error: Option<String>,
    input_buffer: String,
    generation: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bubble history, oldest first.
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// True exactly while a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The current error message, if the last submission failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The unsent input text.
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Replace the unsent input text.
    pub fn set_input_buffer(&mut self, text: impl Into<String>) {
        self.input_buffer = text.into();
    }

    /// Find a bubble by id.
    pub fn bubble(&self, id: &str) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    /// Concatenated text of all bubbles, the context for follow-up prompts.
    /// Derived on every call, never cached.
    pub fn prompt_context(&self) -> String {
        self.bubbles
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Start a submission: append the human bubble, clear the input buffer
    /// and any prior error, and mark the conversation pending.
    ///
    /// Returns `None` (a no-op, not an error) while another submission is in
    /// flight.
    pub fn begin_submission(&mut self, text: impl Into<String>) -> Option<SubmissionTicket> {
        if self.pending {
            tracing::debug!("submission already in flight, ignoring");
            return None;
        }

        let statement = text.into();
        self.generation += 1;

        let ticket = SubmissionTicket {
            generation: self.generation,
            is_first_turn: self.bubbles.is_empty(),
            prompt_context: self.prompt_context(),
            statement: statement.clone(),
        };

        self.bubbles.push(Bubble::human(statement));
        self.input_buffer.clear();
        self.error = None;
        self.pending = true;

        tracing::debug!(
            generation = ticket.generation,
            first_turn = ticket.is_first_turn,
            "submission started"
        );
        Some(ticket)
    }

    /// Finish a submission with a safe generated statement: append the
    /// assistant bubble with the proof-body marker re-appended.
    ///
    /// Returns false when the result was stale and discarded.
    pub fn complete_submission(
        &mut self,
        generation: u64,
        generated: &str,
        response_id: Option<String>,
    ) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        let text = format!("{generated}{}", prompt::STOP_MARKER);
        self.bubbles.push(Bubble::assistant(text, response_id));
        self.pending = false;
        true
    }

    /// Finish a submission whose output was judged unsafe: append nothing
    /// and surface the suppression message.
    pub fn reject_submission(&mut self, generation: u64) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.error = Some(UNSAFE_OUTPUT_ERROR.to_string());
        self.pending = false;
        true
    }

    /// Finish a submission that failed: record the message, append nothing.
    pub fn fail_submission(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.error = Some(message.into());
        self.pending = false;
        true
    }

    /// Remove the most recently appended bubble; no-op on an empty history.
    /// Any in-flight submission is abandoned.
    pub fn clear_one(&mut self) {
        self.bubbles.pop();
        self.pending = false;
        self.error = None;
    }

    /// Empty the history and clear pending/error state. Any in-flight
    /// submission is abandoned.
    pub fn clear_all(&mut self) {
        self.bubbles.clear();
        self.pending = false;
        self.error = None;
    }

    /// A result is applied only if it belongs to the submission that is
    /// still in flight.
    fn accepts(&self, generation: u64) -> bool {
        if self.pending && generation == self.generation {
            true
        } else {
            tracing::warn!(
                generation,
                current = self.generation,
                pending = self.pending,
                "discarding stale submission result"
            );
            false
        }
    }
}
