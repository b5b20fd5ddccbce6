//! HTTP handlers for message endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    ListMessagesHandler, ListMessagesQuery, SubmitMessageError, SubmitMessageHandler,
};
use crate::domain::message::group_by_minute;

use super::dto::{
    ErrorResponse, HistoryGrouping, HistoryQuery, SubmitMessageRequest, SubmitMessageResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct MessageHandlers {
    submit_handler: Arc<SubmitMessageHandler>,
    list_handler: Arc<ListMessagesHandler>,
}

impl MessageHandlers {
    pub fn new(
        submit_handler: Arc<SubmitMessageHandler>,
        list_handler: Arc<ListMessagesHandler>,
    ) -> Self {
        Self {
            submit_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/message - Store a message and push it to live viewers
pub async fn submit_message(
    State(handlers): State<MessageHandlers>,
    payload: Result<Json<SubmitMessageRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected message body");
            // Oversized bodies keep their 413; every other decode failure is a 400.
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, Json(ErrorResponse::new(rejection.body_text()))).into_response();
        }
    };

    let cmd = match request.into_command() {
        Ok(cmd) => cmd,
        Err(err) => return handle_submit_error(err.into()),
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(_) => (StatusCode::CREATED, Json(SubmitMessageResponse::saved())).into_response(),
        Err(err) => handle_submit_error(err),
    }
}

/// GET /api/rooms/:room_id/messages - Room history, oldest first
pub async fn list_messages(
    State(handlers): State<MessageHandlers>,
    Path(room_id): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Response {
    let records = handlers
        .list_handler
        .handle(ListMessagesQuery { room_id })
        .await;

    match params.group {
        Some(HistoryGrouping::Minute) => Json(group_by_minute(records)).into_response(),
        None => Json(records).into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_submit_error(error: SubmitMessageError) -> Response {
    let code = error.code();
    match error {
        SubmitMessageError::Validation(err) => {
            tracing::debug!(%code, field = err.field(), "Rejected message");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
        // Already logged by the handler; clients get no internals.
        SubmitMessageError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal()),
        )
            .into_response(),
    }
}
