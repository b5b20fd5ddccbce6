//! Message module - the records users post to a room.

mod grouping;
mod record;

pub use grouping::{group_by_minute, MinuteGroup};
pub use record::{MessageBody, MessageRecord};
