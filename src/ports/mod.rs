//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `MessageStore` - Append-only per-room message persistence
//! - `MessagePublisher` - Fan-out of stored records to live viewers

mod message_publisher;
mod message_store;

pub use message_publisher::{MessagePublisher, PublishOutcome};
pub use message_store::MessageStore;
