//! Liveness endpoint with live-stream counters.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::adapters::realtime::TopicRegistry;

#[derive(Clone)]
pub struct HealthState {
    registry: Arc<TopicRegistry>,
}

impl HealthState {
    pub fn new(registry: Arc<TopicRegistry>) -> Self {
        Self { registry }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Rooms with at least one live viewer
    pub topics: usize,
    pub subscribers: usize,
}

/// GET /api/health
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.registry.is_closed() {
            "shutting_down"
        } else {
            "ok"
        },
        topics: state.registry.active_topics().len(),
        subscribers: state.registry.total_subscribers(),
    })
}

pub fn health_routes(state: HealthState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .with_state(state)
}
