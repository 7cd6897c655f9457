//! Error taxonomy shared by the HTTP clients.

use thiserror::Error;

/// Errors surfaced by the completion, moderation, and feedback clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure or a non-success status from the endpoint.
    #[error("{0}")]
    Transport(String),

    /// The endpoint answered, but the payload lacks the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Reserved for future input constraints.
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_is_verbatim() {
        let err = ApiError::Transport("503".to_string());
        assert_eq!(err.to_string(), "503");
    }

    #[test]
    fn test_malformed_response_display() {
        let err = ApiError::MalformedResponse("no choices".to_string());
        assert_eq!(err.to_string(), "Malformed response: no choices");
    }

    #[test]
    fn test_validation_display() {
        let err = ApiError::Validation("empty statement".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty statement");
    }
}
