//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter for endpoint exposure; [`app_router`]
//! assembles them with the shared middleware stack.

pub mod health;
pub mod message;

pub use health::{health_routes, HealthState};
pub use message::{message_routes, ErrorResponse, MessageHandlers};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::realtime::{stream_routes, StreamState};
use crate::config::ServerConfig;

/// Build the full application router.
///
/// The request timeout and body limit apply to ingest, history and health
/// only; live streams stay open until the client leaves.
pub fn app_router(
    config: &ServerConfig,
    messages: MessageHandlers,
    streams: StreamState,
) -> Router {
    let health = HealthState::new(streams.registry.clone());

    let bounded = Router::new()
        .merge(message_routes(messages))
        .merge(health_routes(health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()));

    Router::new()
        .merge(bounded)
        .merge(stream_routes(streams))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        if config.is_production() {
            return CorsLayer::new();
        }
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
