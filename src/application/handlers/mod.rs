//! Command and query handlers.

pub mod message;

pub use message::{
    ListMessagesHandler, ListMessagesQuery, SubmitMessageCommand, SubmitMessageError,
    SubmitMessageHandler,
};
