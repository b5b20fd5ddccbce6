//! In-Memory Message Store Adapter
//!
//! Keeps room histories in process memory.
//! Useful for testing and development; contents vanish on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MessageId, RoomId, Timestamp};
use crate::domain::message::{MessageBody, MessageRecord};
use crate::ports::MessageStore;

/// In-memory storage for room messages
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    rooms: Arc<RwLock<HashMap<RoomId, Vec<MessageRecord>>>>,
}

impl InMemoryMessageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms with at least one message
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Total messages across all rooms
    pub async fn message_count(&self) -> usize {
        self.rooms.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(
        &self,
        room: &RoomId,
        body: &MessageBody,
        created_at: Timestamp,
    ) -> Result<MessageRecord, DomainError> {
        let record = MessageRecord::new(MessageId::generate(), body.clone(), created_at);

        let mut rooms = self.rooms.write().await;
        let records = rooms.entry(room.clone()).or_default();
        // Concurrent writers may arrive slightly out of timestamp order.
        let position = records.partition_point(|existing| existing.created_at <= created_at);
        records.insert(position, record.clone());

        Ok(record)
    }

    async fn list(&self, room: &RoomId) -> Result<Vec<MessageRecord>, DomainError> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(room).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn room(id: &str) -> RoomId {
        RoomId::parse(id).unwrap()
    }

    fn body(text: &str) -> MessageBody {
        MessageBody::new(text).unwrap()
    }

    fn at(seconds: i64) -> Timestamp {
        let base = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        Timestamp::from_datetime(base + Duration::seconds(seconds))
    }

    #[tokio::test]
    async fn insert_returns_record_with_fresh_id() {
        let store = InMemoryMessageStore::new();

        let first = store.insert(&room("123456"), &body("a"), at(0)).await.unwrap();
        let second = store.insert(&room("123456"), &body("a"), at(0)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.body, "a");
        assert_eq!(first.created_at, at(0));
    }

    #[tokio::test]
    async fn unknown_room_lists_empty() {
        let store = InMemoryMessageStore::new();

        let records = store.list(&room("000000")).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(store.room_count().await, 0);
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let store = InMemoryMessageStore::new();
        store.insert(&room("111111"), &body("one"), at(0)).await.unwrap();
        store.insert(&room("222222"), &body("two"), at(1)).await.unwrap();

        let records = store.list(&room("111111")).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "one");
        assert_eq!(store.message_count().await, 2);
    }

    #[tokio::test]
    async fn list_is_ascending_even_when_inserted_out_of_order() {
        let store = InMemoryMessageStore::new();
        let target = room("123456");
        store.insert(&target, &body("late"), at(10)).await.unwrap();
        store.insert(&target, &body("early"), at(5)).await.unwrap();

        let bodies: Vec<_> = store
            .list(&target)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.body)
            .collect();

        assert_eq!(bodies, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let store = InMemoryMessageStore::new();
        let target = room("123456");
        for text in ["x", "y", "z"] {
            store.insert(&target, &body(text), at(0)).await.unwrap();
        }

        let bodies: Vec<_> = store
            .list(&target)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.body)
            .collect();

        assert_eq!(bodies, vec!["x", "y", "z"]);
    }
}
