// crates/server/src/lib.rs
//! Crawl-gateway server library.
//!
//! An Axum HTTP server exposing an asynchronous "submit, poll, fetch" API over
//! a crawl engine. Submissions create a task record and return immediately;
//! execution happens out-of-band and is observable only through polling.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, crawl submission, status/result polling)
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Test doubles shared across unit and integration tests
// ============================================================================


// ============================================================================
// Integration Tests
// ============================================================================
