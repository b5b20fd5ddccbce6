//! Server-Sent Events endpoint for live room streams.
//!
//! Handles the connection lifecycle:
//! 1. Validate the room ID (400 on failure, nothing registered)
//! 2. Open a stream session on the room's topic
//! 3. Write message and keepalive frames until disconnect
//! 4. Dropping the response body closes the session

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures::StreamExt;

use crate::adapters::http::ErrorResponse;

use super::registry::TopicRegistry;
use super::session::{Frame, StreamSession};

/// Comment text of keepalive frames.
pub const KEEPALIVE_COMMENT: &str = "heartbeat";

/// Disables proxy response buffering (nginx and compatibles).
const X_ACCEL_BUFFERING: &str = "x-accel-buffering";

/// State required for stream handling.
#[derive(Clone)]
pub struct StreamState {
    pub registry: Arc<TopicRegistry>,
    pub keepalive: Duration,
}

impl StreamState {
    pub fn new(registry: Arc<TopicRegistry>, keepalive: Duration) -> Self {
        Self {
            registry,
            keepalive,
        }
    }
}

/// Open a live stream for a room.
///
/// Route: `GET /api/stream/:room_id`
pub async fn stream_room(
    Path(room_id): Path<String>,
    State(state): State<StreamState>,
) -> Response {
    let session = match StreamSession::open(&state.registry, &room_id, state.keepalive) {
        Ok(session) => session,
        Err(err) => {
            tracing::debug!(room_id = %room_id, error = %err, "Rejected stream request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid room ID")),
            )
                .into_response();
        }
    };

    let events = session.into_stream().filter_map(|frame| async move {
        match frame_to_event(frame) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to encode stream frame");
                None
            }
        }
    });

    (
        [(
            HeaderName::from_static(X_ACCEL_BUFFERING),
            HeaderValue::from_static("no"),
        )],
        Sse::new(events),
    )
        .into_response()
}

/// Encode a frame as an SSE event.
///
/// Messages become a `data:` line carrying the record JSON; keepalives are
/// comment lines that clients ignore.
pub fn frame_to_event(frame: Frame) -> Result<Event, axum::Error> {
    match frame {
        Frame::Message(record) => Event::default().json_data(&record),
        Frame::KeepAlive => Ok(Event::default().comment(KEEPALIVE_COMMENT)),
    }
}

/// Creates the stream router.
pub fn stream_routes(state: StreamState) -> Router {
    Router::new()
        .route("/api/stream/:room_id", get(stream_room))
        .with_state(state)
}
