// crates/server/src/routes/health.rs
//! Unauthenticated service-info endpoints.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /api/health - Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// GET / - Service banner with the endpoint catalogue.
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "crawl-gateway",
        "status": "running",
        "endpoints": [
            {"path": "/api/crawl", "method": "POST", "description": "Start a new crawl task"},
            {"path": "/api/task/{task_id}", "method": "GET", "description": "Check task status"},
            {"path": "/api/result/{task_id}", "method": "GET", "description": "Get task results"},
            {"path": "/api/health", "method": "GET", "description": "Service health check"},
        ],
    }))
}

/// Create the health routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
