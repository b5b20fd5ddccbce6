//! Minute buckets for rendering history.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::MessageRecord;

/// Records that share the same `created_at` minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinuteGroup {
    pub minute: Timestamp,
    pub messages: Vec<MessageRecord>,
}

/// Groups records, already ordered by `created_at`, into consecutive minute
/// buckets.
pub fn group_by_minute(records: Vec<MessageRecord>) -> Vec<MinuteGroup> {
    let mut groups: Vec<MinuteGroup> = Vec::new();

    for record in records {
        let minute = record.created_at.start_of_minute();
        match groups.last_mut() {
            Some(group) if group.minute == minute => group.messages.push(record),
            _ => groups.push(MinuteGroup {
                minute,
                messages: vec![record],
            }),
        }
    }

    groups
}
