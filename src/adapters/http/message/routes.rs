//! HTTP routes for message endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_messages, submit_message, MessageHandlers};

/// Creates the message router with all endpoints.
pub fn message_routes(handlers: MessageHandlers) -> Router {
    Router::new()
        .route("/api/message", post(submit_message))
        .route("/api/rooms/:room_id/messages", get(list_messages))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::realtime::TopicRegistry;
    use crate::adapters::storage::InMemoryMessageStore;
    use crate::application::{ListMessagesHandler, SubmitMessageHandler};
    use crate::domain::foundation::{DomainError, RoomId, Timestamp};
    use crate::domain::message::{MessageBody, MessageRecord};
    use crate::ports::MessageStore;

    struct UnavailableStore;

    #[async_trait]
    impl MessageStore for UnavailableStore {
        async fn insert(
            &self,
            _room: &RoomId,
            _body: &MessageBody,
            _created_at: Timestamp,
        ) -> Result<MessageRecord, DomainError> {
            Err(DomainError::database("connection refused"))
        }

        async fn list(&self, _room: &RoomId) -> Result<Vec<MessageRecord>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
    }

    fn app_with(store: Arc<dyn MessageStore>, registry: Arc<TopicRegistry>) -> Router {
        let handlers = MessageHandlers::new(
            Arc::new(SubmitMessageHandler::new(store.clone(), registry)),
            Arc::new(ListMessagesHandler::new(store)),
        );
        message_routes(handlers)
    }

    fn app() -> Router {
        app_with(
            Arc::new(InMemoryMessageStore::new()),
            Arc::new(TopicRegistry::with_default_capacity()),
        )
    }

    fn post_json(body: impl Into<String>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/message")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn valid_message_returns_201() {
        let response = app()
            .oneshot(post_json(r#"{"room_id":"123456","message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"success": true, "message": "Message saved."})
        );
    }

    #[tokio::test]
    async fn stored_message_appears_in_history() {
        let app = app();

        app.clone()
            .oneshot(post_json(r#"{"room_id":"123456","message":"hello"}"#))
            .await
            .unwrap();
        let response = app.oneshot(get("/api/rooms/123456/messages")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let history = json_body(response).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["message"], "hello");
        assert!(history[0]["_id"].is_string());
        assert!(history[0]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn invalid_room_returns_400() {
        let response = app()
            .oneshot(post_json(r#"{"room_id":"12a456","message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("6-digit"));
    }

    #[tokio::test]
    async fn empty_message_returns_400() {
        let response = app()
            .oneshot(post_json(r#"{"room_id":"123456","message":""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_string_fields_return_400() {
        let response = app()
            .oneshot(post_json(r#"{"room_id":123456,"message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_returns_400() {
        let response = app().oneshot(post_json("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn storage_failure_returns_500_and_publishes_nothing() {
        let registry = Arc::new(TopicRegistry::with_default_capacity());
        let mut watcher = registry.subscribe(&RoomId::parse("123456").unwrap());
        let app = app_with(Arc::new(UnavailableStore), registry);

        let response = app
            .oneshot(post_json(r#"{"room_id":"123456","message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Internal Server Error"})
        );
        assert!(watcher.try_recv().is_none());
    }

    #[tokio::test]
    async fn submit_reaches_live_subscriber() {
        let registry = Arc::new(TopicRegistry::with_default_capacity());
        let mut watcher = registry.subscribe(&RoomId::parse("123456").unwrap());
        let app = app_with(Arc::new(InMemoryMessageStore::new()), registry);

        app.oneshot(post_json(r#"{"room_id":"123456","message":"live"}"#))
            .await
            .unwrap();

        assert_eq!(watcher.try_recv().unwrap().body, "live");
    }

    #[tokio::test]
    async fn unknown_or_malformed_room_history_is_empty() {
        let app = app();

        let empty = app.clone().oneshot(get("/api/rooms/000000/messages")).await.unwrap();
        assert_eq!(empty.status(), StatusCode::OK);
        assert_eq!(json_body(empty).await, json!([]));

        let malformed = app.oneshot(get("/api/rooms/12a456/messages")).await.unwrap();
        assert_eq!(malformed.status(), StatusCode::OK);
        assert_eq!(json_body(malformed).await, json!([]));
    }

    #[tokio::test]
    async fn history_storage_failure_is_empty() {
        let app = app_with(
            Arc::new(UnavailableStore),
            Arc::new(TopicRegistry::with_default_capacity()),
        );

        let response = app.oneshot(get("/api/rooms/123456/messages")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn history_can_be_grouped_by_minute() {
        let app = app();
        for text in ["a", "b"] {
            app.clone()
                .oneshot(post_json(format!(
                    r#"{{"room_id":"123456","message":"{}"}}"#,
                    text
                )))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(get("/api/rooms/123456/messages?group=minute"))
            .await
            .unwrap();

        let groups = json_body(response).await;
        let total: usize = groups
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["messages"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 2);
        assert!(groups[0]["minute"].is_string());
    }
}
