//! Stream sessions: one per connected viewer.
//!
//! A session validates the requested room, subscribes to its topic, and then
//! yields frames until the client goes away or the topic is torn down.
//! Between messages it emits a keepalive frame every period so idle
//! connections are not reaped by intermediaries.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::domain::foundation::{RoomId, ValidationError};
use crate::domain::message::MessageRecord;

use super::registry::{Subscription, TopicRegistry};

/// Default gap between keepalive frames on an idle stream.
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(30);

/// Lifecycle of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opening,
    Streaming,
    Closed,
}

/// One unit written to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Message(MessageRecord),
    KeepAlive,
}

/// A single viewer's live subscription to a room.
pub struct StreamSession {
    room: RoomId,
    state: SessionState,
    keepalive_period: Duration,
    subscription: Option<Subscription>,
    keepalive: Option<Interval>,
}

impl StreamSession {
    /// Open a session on `room_id`.
    ///
    /// A malformed room ID is rejected before anything is registered.
    /// Must be called from within a Tokio runtime.
    pub fn open(
        registry: &Arc<TopicRegistry>,
        room_id: &str,
        keepalive_period: Duration,
    ) -> Result<Self, ValidationError> {
        let room = RoomId::parse(room_id)?;

        let mut session = Self {
            room,
            state: SessionState::Opening,
            keepalive_period,
            subscription: None,
            keepalive: None,
        };
        session.start(registry);
        Ok(session)
    }

    fn start(&mut self, registry: &Arc<TopicRegistry>) {
        let subscription = registry.subscribe(&self.room);

        let mut keepalive = time::interval_at(
            Instant::now() + self.keepalive_period,
            self.keepalive_period,
        );
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(
            room_id = %self.room,
            subscriber_id = %subscription.id(),
            keepalive_secs = self.keepalive_period.as_secs(),
            "Stream session opened"
        );

        self.subscription = Some(subscription);
        self.keepalive = Some(keepalive);
        self.state = SessionState::Streaming;
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Wait for the next frame.
    ///
    /// Queued messages win over a due keepalive. Returns `None` once the
    /// session is closed, including when the registry drops the topic.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        let (Some(subscription), Some(keepalive)) =
            (self.subscription.as_mut(), self.keepalive.as_mut())
        else {
            return None;
        };

        // Biased on purpose: when a message and a due keepalive are both
        // ready, the message goes first and the keepalive follows on the
        // next call. A keepalive carries no data, so only its timing moves.
        let frame = tokio::select! {
            biased;
            record = subscription.recv() => record.map(Frame::Message),
            _ = keepalive.tick() => Some(Frame::KeepAlive),
        };

        if frame.is_none() {
            self.close();
        }
        frame
    }

    /// Deregister and stop producing frames. Idempotent.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.keepalive = None;
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
        tracing::debug!(room_id = %self.room, "Stream session closed");
    }

    /// Turn the session into a stream of frames.
    ///
    /// Dropping the stream closes the session.
    pub fn into_stream(self) -> impl Stream<Item = Frame> + Send + 'static {
        futures::stream::unfold(self, |mut session| async move {
            session.next_frame().await.map(|frame| (frame, session))
        })
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.close();
    }
}
