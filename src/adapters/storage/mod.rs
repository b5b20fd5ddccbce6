//! Storage Adapters
//!
//! In-process implementation of the MessageStore port. The PostgreSQL
//! implementation lives in `adapters::postgres`.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryMessageStore;
//!
//! let store = Arc::new(InMemoryMessageStore::new());
//! ```

mod in_memory_message_store;

pub use in_memory_message_store::InMemoryMessageStore;
