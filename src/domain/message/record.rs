//! Stored message record and the validated message body.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp, ValidationError};

/// Validated, non-empty message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// Validates raw message text.
    ///
    /// Only the empty string is refused. Whitespace is content, and request
    /// size is bounded by the HTTP layer rather than here.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A message as persisted by storage: immutable once created.
///
/// JSON form is `{"_id", "message", "createdAt"}`. Older envelopes that used
/// `id`, `text` or `created_at` still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: MessageId,

    #[serde(rename = "message", alias = "text")]
    pub body: String,

    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: Timestamp,
}

impl MessageRecord {
    pub fn new(id: MessageId, body: MessageBody, created_at: Timestamp) -> Self {
        Self {
            id,
            body: body.into_inner(),
            created_at,
        }
    }
}
