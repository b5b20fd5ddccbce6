//! Real-time delivery of room messages to connected viewers.
//!
//! - `registry` - per-room topics and subscriber queues
//! - `session` - one viewer's subscription plus keepalive timing
//! - `sse` - the Server-Sent Events endpoint

mod registry;
mod session;
mod sse;

pub use registry::{Subscription, SubscriberId, TopicRegistry, DEFAULT_SUBSCRIBER_CAPACITY};
pub use session::{Frame, SessionState, StreamSession, DEFAULT_KEEPALIVE};
pub use sse::{frame_to_event, stream_room, stream_routes, StreamState, KEEPALIVE_COMMENT};
