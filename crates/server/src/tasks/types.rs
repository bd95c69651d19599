// crates/server/src/tasks/types.rs
//! Task records, the status state machine, and client-facing views.

use chrono::{DateTime, Utc};
use crawl_gateway_engine::{CrawlJob, CrawlOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a tracked task.
pub type TaskId = Uuid;

/// Lifecycle status of a task.
///
/// `Pending -> Running -> Completed | Failed`; the terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A state-machine step applied to a record through the store.
#[derive(Debug, Clone)]
pub enum Transition {
    /// `Pending -> Running`, when execution begins.
    Start,
    /// `Running -> Completed`, attaching the produced artifacts.
    Complete(CrawlOutcome),
    /// `Running -> Failed`, attaching a human-readable description.
    Fail(String),
}

impl Transition {
    fn name(&self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::Complete(_) => "complete",
            Transition::Fail(_) => "fail",
        }
    }
}

/// A transition was attempted from a state that does not permit it.
///
/// This is a programming error in the caller, never silently ignored.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {attempted} a {from} task")]
pub struct IllegalTransition {
    pub from: TaskStatus,
    pub attempted: &'static str,
}

/// The unit of tracked work. Owned exclusively by the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub status: TaskStatus,
    /// Original submission parameters. Immutable once submitted.
    pub job: CrawlJob,
    pub created_at: DateTime<Utc>,
    /// Set exactly when the record enters a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
    /// Present iff `status == Completed`.
    pub outcome: Option<CrawlOutcome>,
    /// Present iff `status == Failed`.
    pub error: Option<String>,
}

impl TaskRecord {
    /// A fresh `Pending` record with a random v4 id.
    pub fn new(job: CrawlJob) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: TaskStatus::Pending,
            job,
            created_at: Utc::now(),
            completed_at: None,
            outcome: None,
            error: None,
        }
    }

    /// Apply a transition, returning the next record.
    ///
    /// Pure with respect to `self`; the store commits the returned record
    /// atomically. Illegal transitions are rejected, never absorbed.
    pub fn apply(&self, transition: Transition) -> Result<TaskRecord, IllegalTransition> {
        let mut next = self.clone();
        match (self.status, transition) {
            (TaskStatus::Pending, Transition::Start) => {
                next.status = TaskStatus::Running;
            }
            (TaskStatus::Running, Transition::Complete(outcome)) => {
                next.status = TaskStatus::Completed;
                next.outcome = Some(outcome);
                next.completed_at = Some(Utc::now());
            }
            (TaskStatus::Running, Transition::Fail(error)) => {
                next.status = TaskStatus::Failed;
                next.error = Some(error);
                next.completed_at = Some(Utc::now());
            }
            (from, transition) => {
                return Err(IllegalTransition {
                    from,
                    attempted: transition.name(),
                })
            }
        }
        Ok(next)
    }

    /// Status view: always available once the record exists.
    pub fn status_view(&self) -> TaskStatusResponse {
        TaskStatusResponse {
            task_id: self.id,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }

    /// Result view: `None` until the record reaches a terminal state.
    ///
    /// Returns whichever of `outcome`/`error` is populated; callers check
    /// `status` to know which to read.
    pub fn result_view(&self) -> Option<CrawlResultResponse> {
        if !self.status.is_terminal() {
            return None;
        }
        let outcome = self.outcome.clone();
        let (markdown, links, images) = match outcome {
            Some(o) => (o.markdown, o.links, o.images),
            None => (None, None, None),
        };
        Some(CrawlResultResponse {
            task_id: self.id,
            status: self.status,
            url: self.job.url.clone(),
            markdown,
            links,
            images,
            error: self.error.clone(),
            created_at: self.created_at,
            completed_at: self.completed_at,
        })
    }
}

/// Response for `GET /api/task/{id}`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct TaskStatusResponse {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response for `GET /api/result/{id}`.
///
/// A failed task has the same shape as a completed one; only which of
/// `markdown`/`error` is populated differs.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct CrawlResultResponse {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub url: String,
    pub markdown: Option<String>,
    pub links: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
