//! Message store port.
//!
//! Defines the contract for persisting and reading room messages.
//! Each room is its own append-only partition, created on first write.
//!
//! # Design
//!
//! - **Append-only**: no update or delete operations exist
//! - **Storage-assigned identity**: adapters mint the message id
//! - **Ordered reads**: history comes back ascending by `created_at`

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoomId, Timestamp};
use crate::domain::message::{MessageBody, MessageRecord};

/// Storage port for room messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message to a room.
    ///
    /// `created_at` is assigned by the caller on the server side; the
    /// adapter assigns the identifier. Returns the canonical stored record.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(
        &self,
        room: &RoomId,
        body: &MessageBody,
        created_at: Timestamp,
    ) -> Result<MessageRecord, DomainError>;

    /// All messages in a room, ascending by `created_at`, ties in insertion
    /// order. An unknown room yields an empty list.
    async fn list(&self, room: &RoomId) -> Result<Vec<MessageRecord>, DomainError>;
}
