// crates/server/src/routes/tasks.rs
//! Status and result polling endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::tasks::{CrawlResultResponse, TaskId, TaskStatusResponse};

/// A malformed id can never name a record, so it is indistinguishable from an
/// unknown one: both come back as the same 404.
fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    TaskId::parse_str(raw).map_err(|_| ApiError::TaskNotFound(raw.to_string()))
}

/// GET /api/task/{id} - Current status of a task.
pub async fn task_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskStatusResponse>> {
    let record = state.store.get(parse_task_id(&id)?)?;
    Ok(Json(record.status_view()))
}

/// GET /api/result/{id} - Result of a terminal task.
///
/// 400 while the task is still pending/running; the caller polls the status
/// endpoint until a terminal state first.
pub async fn task_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CrawlResultResponse>> {
    let id = parse_task_id(&id)?;
    let record = state.store.get(id)?;
    let view = record.result_view().ok_or(ApiError::NotReady(id))?;
    Ok(Json(view))
}
