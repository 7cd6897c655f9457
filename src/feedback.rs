//! Rating side-channel for generated responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A thumbs-up or thumbs-down on one generated response.
///
/// Serializes to the wire integers `1` and `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Up,
    Down,
}

impl Rating {
    /// Wire value.
    pub fn value(self) -> i8 {
        match self {
            Rating::Up => 1,
            Rating::Down => -1,
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i8::deserialize(deserializer)? {
            1 => Ok(Rating::Up),
            -1 => Ok(Rating::Down),
            other => Err(serde::de::Error::custom(format!(
                "rating must be 1 or -1, got {other}"
            ))),
        }
    }
}

/// Interface for submitting a rating for a generated response.
///
/// Duplicate ratings for the same id are accepted as independent events;
/// idempotency is not required.
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    /// Post the rating; returns the server's human-readable acknowledgment.
    async fn submit_rating(&self, response_id: &str, rating: Rating) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_wire_values() {
        assert_eq!(Rating::Up.value(), 1);
        assert_eq!(Rating::Down.value(), -1);
    }

    #[test]
    fn test_rating_serializes_to_integer() {
        assert_eq!(serde_json::to_value(Rating::Up).unwrap(), 1);
        assert_eq!(serde_json::to_value(Rating::Down).unwrap(), -1);
    }

    #[test]
    fn test_rating_deserializes_from_integer() {
        assert_eq!(serde_json::from_str::<Rating>("1").unwrap(), Rating::Up);
        assert_eq!(serde_json::from_str::<Rating>("-1").unwrap(), Rating::Down);
        assert!(serde_json::from_str::<Rating>("0").is_err());
    }
}
