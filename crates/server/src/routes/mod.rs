// crates/server/src/routes/mod.rs
//! API route handlers for the crawl gateway.

pub mod crawl;
pub mod health;
pub mod tasks;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::auth::require_api_key;
use crate::state::AppState;

/// Create the combined API router.
///
/// Routes:
/// - GET  /            - Service banner (no auth)
/// - GET  /api/health  - Health check (no auth)
/// - POST /api/crawl   - Submit a crawl task
/// - GET  /api/task/{id}   - Poll task status
/// - GET  /api/result/{id} - Fetch task result once terminal
pub fn api_routes(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/crawl", post(crawl::submit_crawl))
        .route("/task/{id}", get(tasks::task_status))
        .route("/result/{id}", get(tasks::task_result))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/", get(health::service_info))
        .nest("/api", health::router().merge(protected))
        .with_state(state)
}
