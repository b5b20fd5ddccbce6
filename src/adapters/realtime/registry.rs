//! Topic registry for room-scoped message fan-out.
//!
//! Topics are keyed by room ID. Every open stream owns one [`Subscription`]
//! with its own bounded queue; the registry keeps only the sending half.
//!
//! # Architecture
//!
//! ```text
//! Topic: 123456              Topic: 654321
//! ├── subscriber 1 [queue]   ├── subscriber 4 [queue]
//! ├── subscriber 2 [queue]   └── subscriber 5 [queue]
//! └── subscriber 3 [queue]
//! ```
//!
//! A publish to 123456 reaches subscribers 1-3 only. A subscriber whose
//! queue is full is disconnected instead of blocking the publisher.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::foundation::RoomId;
use crate::domain::message::MessageRecord;
use crate::ports::{MessagePublisher, PublishOutcome};

/// Default per-subscriber queue depth.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 64;

/// Identifier of one subscription, unique for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Subscribers = HashMap<SubscriberId, mpsc::Sender<MessageRecord>>;

/// Process-wide mapping from room to its live subscribers.
///
/// # Thread Safety
///
/// A single synchronous mutex guards the map. It is held only while the map
/// is mutated or while `publish` snapshots a topic, never across delivery or
/// an `.await`. Being synchronous lets [`Subscription`] deregister from
/// `Drop`.
///
/// Once [`shutdown`](Self::shutdown) has run the registry stays closed:
/// later subscriptions are handed out already ended.
pub struct TopicRegistry {
    topics: Mutex<HashMap<RoomId, Subscribers>>,
    next_subscriber: AtomicU64,
    subscriber_capacity: usize,
    closed: AtomicBool,
}

impl TopicRegistry {
    /// Create a registry whose subscribers each buffer up to
    /// `subscriber_capacity` undelivered records (minimum 1).
    pub fn new(subscriber_capacity: usize) -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            next_subscriber: AtomicU64::new(1),
            subscriber_capacity: subscriber_capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Create with default capacity (64 records per subscriber).
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    fn topics(&self) -> MutexGuard<'_, HashMap<RoomId, Subscribers>> {
        // The map stays consistent across a panic: every mutation is a
        // single insert or remove.
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber for `room`, creating the topic if needed.
    pub fn subscribe(self: &Arc<Self>, room: &RoomId) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.subscriber_capacity);
        let id = SubscriberId(self.next_subscriber.fetch_add(1, Ordering::Relaxed));

        // Checked under the lock so a concurrent shutdown cannot miss it.
        let registered = {
            let mut topics = self.topics();
            if self.closed.load(Ordering::Acquire) {
                drop(sender);
                None
            } else {
                let topic = topics.entry(room.clone()).or_default();
                topic.insert(id, sender);
                Some(topic.len())
            }
        };

        match registered {
            Some(subscribers) => {
                tracing::debug!(room_id = %room, subscriber_id = %id, subscribers, "Subscribed");
            }
            None => {
                tracing::debug!(
                    room_id = %room,
                    subscriber_id = %id,
                    "Registry closed, subscription ends at once"
                );
            }
        }

        Subscription {
            id,
            room: room.clone(),
            receiver,
            registry: Arc::clone(self),
            active: registered.is_some(),
        }
    }

    /// Remove a subscription from its topic.
    ///
    /// Idempotent: unknown or already removed handles are ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.remove(&subscription.room, subscription.id);
    }

    fn remove(&self, room: &RoomId, id: SubscriberId) -> bool {
        let removed = {
            let mut topics = self.topics();
            let Some(subscribers) = topics.get_mut(room) else {
                return false;
            };
            let removed = subscribers.remove(&id).is_some();
            if subscribers.is_empty() {
                topics.remove(room);
            }
            removed
        };

        if removed {
            tracing::debug!(room_id = %room, subscriber_id = %id, "Unsubscribed");
        }
        removed
    }

    /// Deliver `record` to every subscriber of `room` at the time of the call.
    ///
    /// Never blocks and never fails. Subscribers whose queue is full or whose
    /// receiver is gone are removed; their channel closes once the records
    /// already queued are drained.
    pub fn publish(&self, room: &RoomId, record: &MessageRecord) -> PublishOutcome {
        let snapshot: Vec<(SubscriberId, mpsc::Sender<MessageRecord>)> = match self.topics().get(room) {
            Some(subscribers) => subscribers
                .iter()
                .map(|(id, sender)| (*id, sender.clone()))
                .collect(),
            None => return PublishOutcome::default(),
        };

        let mut outcome = PublishOutcome::default();
        let mut stale = Vec::new();

        for (id, sender) in snapshot {
            match sender.try_send(record.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        room_id = %room,
                        subscriber_id = %id,
                        capacity = self.subscriber_capacity,
                        "Subscriber queue full, disconnecting"
                    );
                    stale.push(id);
                }
                Err(TrySendError::Closed(_)) => stale.push(id),
            }
        }

        if !stale.is_empty() {
            let mut topics = self.topics();
            if let Some(subscribers) = topics.get_mut(room) {
                for id in &stale {
                    subscribers.remove(id);
                }
                if subscribers.is_empty() {
                    topics.remove(room);
                }
            }
        }
        outcome.dropped = stale.len();

        outcome
    }

    /// Drop every topic and refuse new ones. All open subscriptions
    /// observe end-of-stream.
    pub fn shutdown(&self) {
        let drained = {
            let mut topics = self.topics();
            self.closed.store(true, Ordering::Release);
            std::mem::take(&mut *topics)
        };
        let subscribers: usize = drained.values().map(HashMap::len).sum();
        tracing::info!(topics = drained.len(), subscribers, "Topic registry shut down");
    }

    /// Whether `shutdown` has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of live subscribers for a room (0 if no topic exists).
    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        self.topics().get(room).map(HashMap::len).unwrap_or(0)
    }

    /// Rooms that currently have a topic (for monitoring/debugging).
    pub fn active_topics(&self) -> Vec<RoomId> {
        self.topics().keys().cloned().collect()
    }

    /// Total subscribers across all rooms.
    pub fn total_subscribers(&self) -> usize {
        self.topics().values().map(HashMap::len).sum()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl MessagePublisher for TopicRegistry {
    async fn publish(&self, room: &RoomId, record: &MessageRecord) -> PublishOutcome {
        TopicRegistry::publish(self, room, record)
    }
}

/// One stream's registration to one topic.
///
/// Owns the receiving half of the subscriber queue. Closing or dropping it
/// deregisters from the registry exactly once.
pub struct Subscription {
    id: SubscriberId,
    room: RoomId,
    receiver: mpsc::Receiver<MessageRecord>,
    registry: Arc<TopicRegistry>,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Whether `close` has not yet run.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Wait for the next record. `None` once the channel is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<MessageRecord> {
        self.receiver.recv().await
    }

    /// Take a queued record without waiting.
    pub fn try_recv(&mut self) -> Option<MessageRecord> {
        self.receiver.try_recv().ok()
    }

    /// Deregister and stop accepting records. Safe to call repeatedly.
    pub fn close(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.registry.remove(&self.room, self.id);
        self.receiver.close();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("room", &self.room)
            .field("active", &self.active)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
