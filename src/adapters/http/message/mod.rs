//! HTTP adapter for message ingest and history.
//!
//! Endpoints:
//! - `POST /api/message` - Store a message and notify live viewers
//! - `GET /api/rooms/:room_id/messages` - Room history (optionally `?group=minute`)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HistoryQuery, SubmitMessageRequest, SubmitMessageResponse};
pub use handlers::MessageHandlers;
pub use routes::message_routes;
