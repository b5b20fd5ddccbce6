//! MessagePublisher port - Interface for notifying live viewers.
//!
//! The ingest path publishes every stored record through this port without
//! knowing how it reaches connected clients. The in-process
//! `TopicRegistry` implements it; a broker-backed adapter would slot in here
//! for multi-node deployments.

use async_trait::async_trait;

use crate::domain::foundation::RoomId;
use crate::domain::message::MessageRecord;

/// Result of a single fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Subscribers that had the record queued.
    pub delivered: usize,
    /// Subscribers removed during this publish (gone or overflowing).
    pub dropped: usize,
}

/// Port for publishing stored records to a room's live subscribers.
///
/// Implementations must:
/// - Deliver at most once, best effort, to subscribers present at call time
/// - Never block on a slow subscriber
/// - Never report per-subscriber failures to the caller
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a record to everyone currently watching `room`.
    async fn publish(&self, room: &RoomId, record: &MessageRecord) -> PublishOutcome;
}
