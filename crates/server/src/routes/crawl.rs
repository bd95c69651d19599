// crates/server/src/routes/crawl.rs
//! Crawl submission endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use crawl_gateway_engine::CrawlJob;
use serde::Serialize;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::tasks::{TaskId, TaskStatus};

/// Response for POST /api/crawl.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct CrawlAccepted {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Submission-time validation. Everything about the job's own execution is
/// asynchronous; only errors detectable here surface to the caller.
fn validate(job: &CrawlJob) -> Result<(), ApiError> {
    if job.url.trim().is_empty() {
        return Err(ApiError::Validation("url: must not be empty".to_string()));
    }
    let parsed = Url::parse(&job.url)
        .map_err(|e| ApiError::Validation(format!("url: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::Validation(
            "url: must be an http(s) URL".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/crawl - Submit a crawl job.
///
/// Creates the record, schedules execution, and returns without waiting for
/// the job to start, let alone finish.
pub async fn submit_crawl(
    State(state): State<Arc<AppState>>,
    Json(job): Json<CrawlJob>,
) -> ApiResult<Json<CrawlAccepted>> {
    validate(&job)?;

    let id = state.store.create(job.clone());
    let record = state.store.get(id)?;

    state
        .dispatcher
        .dispatch(id, job)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(task_id = %id, url = %record.job.url, "crawl task created");
    Ok(Json(CrawlAccepted {
        task_id: id,
        status: record.status,
        created_at: record.created_at,
    }))
}
