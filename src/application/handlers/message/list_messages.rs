//! ListMessagesHandler - Query handler for a room's history.
//!
//! History is best effort: a malformed room or a storage failure yields an
//! empty list rather than an error.

use std::sync::Arc;

use crate::domain::foundation::RoomId;
use crate::domain::message::MessageRecord;
use crate::ports::MessageStore;

/// Query for a room's stored messages.
#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub room_id: String,
}

/// Handler for reading room history.
pub struct ListMessagesHandler {
    store: Arc<dyn MessageStore>,
}

impl ListMessagesHandler {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// All records in the room, ascending by `created_at`.
    pub async fn handle(&self, query: ListMessagesQuery) -> Vec<MessageRecord> {
        let room = match RoomId::parse(&query.room_id) {
            Ok(room) => room,
            Err(err) => {
                tracing::debug!(room_id = %query.room_id, error = %err, "History requested for malformed room");
                return Vec::new();
            }
        };

        match self.store.list(&room).await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(room_id = %room, error = %err, "Failed to load history");
                Vec::new()
            }
        }
    }
}
