//! SubmitMessageHandler - Command handler for posting a message to a room.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, Timestamp, ValidationError};
use crate::domain::message::{MessageBody, MessageRecord};
use crate::ports::{MessagePublisher, MessageStore};

/// Command to post a message.
///
/// Fields hold the raw client input; the handler validates them.
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    pub room_id: String,
    pub message: String,
}

/// Errors from submitting a message.
#[derive(Debug, Error)]
pub enum SubmitMessageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage failure: {0}")]
    Storage(DomainError),
}

impl SubmitMessageError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SubmitMessageError::Validation(ValidationError::InvalidRoomId { .. }) => {
                ErrorCode::InvalidRoomId
            }
            SubmitMessageError::Validation(_) => ErrorCode::ValidationFailed,
            SubmitMessageError::Storage(err) => err.code,
        }
    }
}

/// Handler for posting messages.
///
/// Persists first, then fans out to live viewers. A record is never
/// published unless it was stored.
pub struct SubmitMessageHandler {
    store: Arc<dyn MessageStore>,
    publisher: Arc<dyn MessagePublisher>,
}

impl SubmitMessageHandler {
    pub fn new(store: Arc<dyn MessageStore>, publisher: Arc<dyn MessagePublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn handle(
        &self,
        cmd: SubmitMessageCommand,
    ) -> Result<MessageRecord, SubmitMessageError> {
        // 1. Validate input
        let room = RoomId::parse(&cmd.room_id)?;
        let body = MessageBody::new(cmd.message)?;

        // 2. Persist
        let record = self
            .store
            .insert(&room, &body, Timestamp::now())
            .await
            .map_err(|err| {
                tracing::error!(
                    room_id = %room,
                    error = %err,
                    details = ?err.details,
                    "Failed to store message"
                );
                SubmitMessageError::Storage(err)
            })?;

        // 3. Fan out to whoever is watching right now
        let outcome = self.publisher.publish(&room, &record).await;
        tracing::debug!(
            room_id = %room,
            message_id = %record.id,
            delivered = outcome.delivered,
            dropped = outcome.dropped,
            "Message published"
        );

        Ok(record)
    }
}
