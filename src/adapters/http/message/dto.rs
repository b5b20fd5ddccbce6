//! HTTP DTOs for message endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::SubmitMessageCommand;
use crate::domain::foundation::ValidationError;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/message`.
///
/// Fields are kept untyped so that a number or object where a string is
/// expected is reported as a validation failure, not a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitMessageRequest {
    #[serde(default)]
    pub room_id: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl SubmitMessageRequest {
    /// Check JSON types and build the command.
    pub fn into_command(self) -> Result<SubmitMessageCommand, ValidationError> {
        let room_id = match self.room_id {
            Some(Value::String(room_id)) => room_id,
            Some(other) => return Err(ValidationError::invalid_room_id(other.to_string())),
            None => return Err(ValidationError::invalid_room_id("")),
        };

        let message = match self.message {
            Some(Value::String(message)) => message,
            Some(Value::Null) | None => return Err(ValidationError::empty_field("message")),
            Some(_) => return Err(ValidationError::invalid_type("message", "string")),
        };

        Ok(SubmitMessageCommand { room_id, message })
    }
}

/// Optional presentation of the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryGrouping {
    Minute,
}

/// Query parameters for room history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub group: Option<HistoryGrouping>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a stored message.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitMessageResponse {
    pub success: bool,
    pub message: String,
}

impl SubmitMessageResponse {
    pub fn saved() -> Self {
        Self {
            success: true,
            message: "Message saved.".to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new("Internal Server Error")
    }
}
