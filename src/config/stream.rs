//! Live stream configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_SUBSCRIBER_BUFFER: usize = 10_000;

/// Live stream tuning
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    /// Seconds between keepalive frames on an idle stream
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,

    /// Records a subscriber may lag behind before it is disconnected
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

impl StreamConfig {
    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    /// Validate stream configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.keepalive_secs == 0 {
            return Err(ValidationError::InvalidKeepalive);
        }
        if self.subscriber_buffer == 0 || self.subscriber_buffer > MAX_SUBSCRIBER_BUFFER {
            return Err(ValidationError::InvalidSubscriberBuffer);
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            keepalive_secs: default_keepalive(),
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

fn default_keepalive() -> u64 {
    30
}

fn default_subscriber_buffer() -> usize {
    64
}
