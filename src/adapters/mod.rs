//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - REST endpoints for ingest, history and health
//! - `realtime` - topic registry and Server-Sent Events streams
//! - `postgres` - durable message store
//! - `storage` - in-memory message store

pub mod http;
pub mod postgres;
pub mod realtime;
pub mod storage;

pub use http::{app_router, MessageHandlers};
pub use postgres::PostgresMessageStore;
pub use realtime::{StreamState, TopicRegistry};
pub use storage::InMemoryMessageStore;
