// crates/server/src/auth.rs
//! Shared-secret API key middleware.
//!
//! Every protected route requires the `X-API-Key` header to match the
//! configured secret. Rejection happens before any handler runs, so an
//! unauthorized submission never creates a record.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time comparison of the provided key against the expected one.
fn api_key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Middleware guarding the task endpoints.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !api_key_matches(provided, &state.api_key) {
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}
