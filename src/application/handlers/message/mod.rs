//! Message command and query handlers.

mod list_messages;
mod submit_message;

pub use list_messages::{ListMessagesHandler, ListMessagesQuery};
pub use submit_message::{SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler};
