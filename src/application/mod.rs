//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes (submit) and reads (history) have separate handlers.

pub mod handlers;

pub use handlers::{
    ListMessagesHandler, ListMessagesQuery, SubmitMessageCommand, SubmitMessageError,
    SubmitMessageHandler,
};
