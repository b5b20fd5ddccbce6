//! PostgreSQL implementation of MessageStore.
//!
//! Every room shares one `messages` table, partitioned logically by
//! `room_id`. `seq` breaks ties between equal timestamps.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, MessageId, RoomId, Timestamp};
use crate::domain::message::{MessageBody, MessageRecord};
use crate::ports::MessageStore;

/// PostgreSQL implementation of MessageStore.
#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn insert(
        &self,
        room: &RoomId,
        body: &MessageBody,
        created_at: Timestamp,
    ) -> Result<MessageRecord, DomainError> {
        let id = MessageId::generate();

        // Read back what was stored: the column keeps microseconds only.
        let row = sqlx::query(
            r#"
            INSERT INTO messages (id, room_id, body, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, body, created_at
            "#,
        )
        .bind(id.as_str())
        .bind(room.as_str())
        .bind(body.as_str())
        .bind(created_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to insert message: {}", e))
                .with_detail("room_id", room.as_str())
        })?;

        row_to_record(row)
    }

    async fn list(&self, room: &RoomId) -> Result<Vec<MessageRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body, created_at
            FROM messages
            WHERE room_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(room.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to list messages: {}", e))
                .with_detail("room_id", room.as_str())
        })?;

        rows.into_iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: sqlx::postgres::PgRow) -> Result<MessageRecord, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;

    let body: String = row
        .try_get("body")
        .map_err(|e| DomainError::database(format!("Failed to get body: {}", e)))?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database(format!("Failed to get created_at: {}", e)))?;

    Ok(MessageRecord {
        id: MessageId::from_stored(id),
        body,
        created_at: Timestamp::from_datetime(created_at),
    })
}
