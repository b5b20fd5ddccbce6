//! End-to-end fan-out through the public router.
//!
//! A viewer streams a room, a message is posted to it, and the viewer sees
//! exactly that record while history reflects it.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use echovault::adapters::{
    app_router, InMemoryMessageStore, MessageHandlers, StreamState, TopicRegistry,
};
use echovault::application::{ListMessagesHandler, SubmitMessageHandler};
use echovault::config::ServerConfig;
use echovault::domain::foundation::RoomId;

struct TestApp {
    router: Router,
    registry: Arc<TopicRegistry>,
}

fn test_app() -> TestApp {
    let store = Arc::new(InMemoryMessageStore::new());
    let registry = Arc::new(TopicRegistry::with_default_capacity());
    let messages = MessageHandlers::new(
        Arc::new(SubmitMessageHandler::new(store.clone(), registry.clone())),
        Arc::new(ListMessagesHandler::new(store)),
    );
    let streams = StreamState::new(registry.clone(), Duration::from_secs(30));

    TestApp {
        router: app_router(&ServerConfig::default(), messages, streams),
        registry,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_message(room_id: &str, message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/message")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"room_id": room_id, "message": message}).to_string(),
        ))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn parse_data_frame(chunk: &[u8]) -> Value {
    let text = std::str::from_utf8(chunk).unwrap();
    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data:").map(str::trim_start))
        .expect("frame has a data line");
    serde_json::from_str(data).unwrap()
}

#[tokio::test(start_paused = true)]
async fn posted_message_reaches_open_stream_and_history() {
    let app = test_app();

    let stream = app.router.clone().oneshot(get("/api/stream/123456")).await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    let mut frames = stream.into_body().into_data_stream();

    let posted = app
        .router
        .clone()
        .oneshot(post_message("123456", "hello"))
        .await
        .unwrap();
    assert_eq!(posted.status(), StatusCode::CREATED);

    let chunk = frames.next().await.unwrap().unwrap();
    let record = parse_data_frame(&chunk);
    assert_eq!(record["message"], "hello");
    assert!(record["_id"].is_string());
    assert!(record["createdAt"].is_string());

    // Exactly one data frame: the next thing on the wire is the keepalive.
    let next = tokio::time::timeout(Duration::from_secs(31), frames.next())
        .await
        .expect("keepalive within one period")
        .unwrap()
        .unwrap();
    let text = std::str::from_utf8(&next).unwrap();
    assert!(text.starts_with(':'), "unexpected frame: {}", text);
    assert!(!text.contains("data:"));

    let history = json_body(
        app.router
            .clone()
            .oneshot(get("/api/rooms/123456/messages"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["_id"], record["_id"]);
    assert_eq!(history[0]["createdAt"], record["createdAt"]);
}

#[tokio::test]
async fn stream_only_sees_its_own_room() {
    let app = test_app();

    let stream = app.router.clone().oneshot(get("/api/stream/111111")).await.unwrap();
    let mut frames = stream.into_body().into_data_stream();

    for (room, text) in [("222222", "elsewhere"), ("111111", "here")] {
        let response = app
            .router
            .clone()
            .oneshot(post_message(room, text))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let chunk = frames.next().await.unwrap().unwrap();
    assert_eq!(parse_data_frame(&chunk)["message"], "here");
}

#[tokio::test]
async fn malformed_room_is_rejected_everywhere() {
    let app = test_app();

    let stream = app.router.clone().oneshot(get("/api/stream/12a456")).await.unwrap();
    assert_eq!(stream.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(stream).await, json!({"error": "Invalid room ID"}));

    let posted = app
        .router
        .clone()
        .oneshot(post_message("12a456", "hello"))
        .await
        .unwrap();
    assert_eq!(posted.status(), StatusCode::BAD_REQUEST);

    assert!(app.registry.active_topics().is_empty());
}

#[tokio::test]
async fn empty_room_history_is_empty_array() {
    let app = test_app();

    let response = app
        .router
        .oneshot(get("/api/rooms/000000/messages"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn closing_stream_releases_subscription() {
    let app = test_app();
    let room = RoomId::parse("123456").unwrap();

    let stream = app.router.clone().oneshot(get("/api/stream/123456")).await.unwrap();
    assert_eq!(app.registry.subscriber_count(&room), 1);

    drop(stream);
    assert_eq!(app.registry.subscriber_count(&room), 0);

    let posted = app
        .router
        .clone()
        .oneshot(post_message("123456", "nobody listening"))
        .await
        .unwrap();
    assert_eq!(posted.status(), StatusCode::CREATED);
}

#[tokio::test(start_paused = true)]
async fn idle_stream_receives_keepalive_comment() {
    let app = test_app();

    let stream = app.router.clone().oneshot(get("/api/stream/123456")).await.unwrap();
    let mut frames = stream.into_body().into_data_stream();

    let chunk = frames.next().await.unwrap().unwrap();
    let text = std::str::from_utf8(&chunk).unwrap();
    assert!(text.starts_with(':'));
    assert!(text.contains("heartbeat"));
}

#[tokio::test]
async fn registry_shutdown_ends_open_streams() {
    let app = test_app();

    let stream = app.router.clone().oneshot(get("/api/stream/123456")).await.unwrap();
    let mut frames = stream.into_body().into_data_stream();

    app.registry.shutdown();

    assert!(frames.next().await.is_none());
}

#[tokio::test]
async fn stream_opened_after_shutdown_ends_immediately() {
    let app = test_app();
    app.registry.shutdown();

    let stream = app.router.clone().oneshot(get("/api/stream/123456")).await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    let mut frames = stream.into_body().into_data_stream();

    assert!(frames.next().await.is_none());
    assert_eq!(app.registry.total_subscribers(), 0);
}
