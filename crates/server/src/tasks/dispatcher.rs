// crates/server/src/tasks/dispatcher.rs
//! Fire-and-forget job execution.
//!
//! `dispatch` returns to the submitting caller immediately; a spawned tokio
//! task walks the record through `Running` and into exactly one terminal
//! state. Engine failures, panics, and timeouts are all absorbed here and
//! recorded on the task — nothing about execution ever reaches the caller.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crawl_gateway_engine::{CrawlEngine, CrawlJob};
use thiserror::Error;

use super::store::TaskStore;
use super::types::{TaskId, Transition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Each task id is dispatched at most once; a second attempt is a
    /// programming error, not a retry.
    #[error("task {0} already dispatched")]
    AlreadyDispatched(TaskId),
}

/// Runs submitted jobs asynchronously, exactly once per task id.
pub struct Dispatcher {
    store: Arc<dyn TaskStore>,
    engine: Arc<dyn CrawlEngine>,
    job_timeout: Duration,
    dispatched: Mutex<HashSet<TaskId>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn TaskStore>,
        engine: Arc<dyn CrawlEngine>,
        job_timeout: Duration,
    ) -> Self {
        Self {
            store,
            engine,
            job_timeout,
            dispatched: Mutex::new(HashSet::new()),
        }
    }

    /// Schedule execution of `job` under task `id` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, id: TaskId, job: CrawlJob) -> Result<(), DispatchError> {
        {
            let mut seen = self
                .dispatched
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !seen.insert(id) {
                return Err(DispatchError::AlreadyDispatched(id));
            }
        }

        let store = Arc::clone(&self.store);
        let engine = Arc::clone(&self.engine);
        let timeout = self.job_timeout;
        tokio::spawn(async move {
            run_task(store, engine, id, job, timeout).await;
        });
        Ok(())
    }
}

async fn run_task(
    store: Arc<dyn TaskStore>,
    engine: Arc<dyn CrawlEngine>,
    id: TaskId,
    job: CrawlJob,
    timeout: Duration,
) {
    let url = job.url.clone();

    if let Err(e) = store.update(id, Transition::Start) {
        tracing::error!(task_id = %id, error = %e, "could not mark task running");
        return;
    }
    tracing::info!(task_id = %id, url = %url, "crawl started");

    // The engine runs on its own task so a panic inside it unwinds there and
    // surfaces as a JoinError instead of killing this supervisor.
    let mut run = tokio::spawn(async move { engine.run_job(&job).await });

    let transition = tokio::select! {
        joined = &mut run => match joined {
            Ok(Ok(outcome)) => Transition::Complete(outcome),
            Ok(Err(e)) => {
                tracing::warn!(task_id = %id, url = %url, error = %e, "crawl failed");
                Transition::Fail(e.to_string())
            }
            Err(join_err) => {
                tracing::error!(task_id = %id, url = %url, error = %join_err, "crawl task panicked");
                Transition::Fail("crawl aborted unexpectedly".to_string())
            }
        },
        _ = tokio::time::sleep(timeout) => {
            run.abort();
            tracing::warn!(task_id = %id, url = %url, timeout_secs = timeout.as_secs(), "crawl timed out");
            Transition::Fail(format!("crawl timed out after {}s", timeout.as_secs()))
        }
    };

    match store.update(id, transition) {
        Ok(record) => {
            tracing::info!(task_id = %id, status = %record.status, "crawl finished");
        }
        Err(e) => {
            tracing::error!(task_id = %id, error = %e, "could not commit terminal transition");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::store::InMemoryTaskStore;
    use crate::tasks::types::TaskStatus;
    use async_trait::async_trait;
    use crawl_gateway_engine::{CrawlOutcome, EngineError};

    /// Deterministic engine double.
    enum FakeEngine {
        Succeeds,
        Fails(&'static str),
        Hangs,
    }

    #[async_trait]
    impl CrawlEngine for FakeEngine {
        async fn run_job(&self, job: &CrawlJob) -> Result<CrawlOutcome, EngineError> {
            match self {
                FakeEngine::Succeeds => Ok(CrawlOutcome {
                    markdown: Some(format!("# {}", job.url)),
                    links: Some(vec![]),
                    images: None,
                }),
                FakeEngine::Fails(reason) => Err(EngineError::UnsupportedUrl {
                    url: job.url.clone(),
                    reason: reason.to_string(),
                }),
                FakeEngine::Hangs => std::future::pending().await,
            }
        }
    }

    fn harness(engine: FakeEngine, timeout: Duration) -> (Arc<InMemoryTaskStore>, Dispatcher) {
        let store = Arc::new(InMemoryTaskStore::new());
        let dispatcher = Dispatcher::new(store.clone(), Arc::new(engine), timeout);
        (store, dispatcher)
    }

    async fn wait_terminal(store: &InMemoryTaskStore, id: TaskId) -> TaskStatus {
        for _ in 0..200 {
            let status = store.get(id).unwrap().status;
            if status.is_terminal() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("task never reached a terminal state");
    }

    #[tokio::test]
    async fn test_dispatch_returns_before_completion() {
        let (store, dispatcher) = harness(FakeEngine::Succeeds, Duration::from_secs(5));
        let id = store.create(CrawlJob::new("https://example.com"));

        dispatcher.dispatch(id, CrawlJob::new("https://example.com")).unwrap();
        // dispatch returned; the record has not been touched by us since create.
        let status = store.get(id).unwrap().status;
        assert!(status == TaskStatus::Pending || status == TaskStatus::Running);

        assert_eq!(wait_terminal(&store, id).await, TaskStatus::Completed);
        let record = store.get(id).unwrap();
        assert_eq!(record.outcome.unwrap().markdown.unwrap(), "# https://example.com");
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn test_engine_failure_is_absorbed_into_record() {
        let (store, dispatcher) = harness(FakeEngine::Fails("no such host"), Duration::from_secs(5));
        let id = store.create(CrawlJob::new("https://nowhere.invalid"));

        dispatcher.dispatch(id, CrawlJob::new("https://nowhere.invalid")).unwrap();
        assert_eq!(wait_terminal(&store, id).await, TaskStatus::Failed);

        let record = store.get(id).unwrap();
        let error = record.error.unwrap();
        assert!(error.contains("no such host"), "error was: {error}");
        assert!(record.outcome.is_none());
        assert!(record.completed_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_job_is_force_failed_at_timeout() {
        let (store, dispatcher) = harness(FakeEngine::Hangs, Duration::from_secs(60));
        let id = store.create(CrawlJob::new("https://slow.example"));

        dispatcher.dispatch(id, CrawlJob::new("https://slow.example")).unwrap();

        // Paused time auto-advances past the 60s bound once all tasks idle.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(store.get(id).unwrap().status, TaskStatus::Failed);
        let record = store.get(id).unwrap();
        assert_eq!(record.error.as_deref(), Some("crawl timed out after 60s"));
    }

    #[tokio::test]
    async fn test_second_dispatch_for_same_id_rejected() {
        let (store, dispatcher) = harness(FakeEngine::Succeeds, Duration::from_secs(5));
        let id = store.create(CrawlJob::new("https://example.com"));

        dispatcher.dispatch(id, CrawlJob::new("https://example.com")).unwrap();
        let err = dispatcher
            .dispatch(id, CrawlJob::new("https://example.com"))
            .unwrap_err();
        assert_eq!(err, DispatchError::AlreadyDispatched(id));

        // The first dispatch still runs to completion exactly once.
        assert_eq!(wait_terminal(&store, id).await, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_concurrent_jobs_run_independently() {
        let (store, dispatcher) = harness(FakeEngine::Succeeds, Duration::from_secs(5));

        let ids: Vec<TaskId> = (0..8)
            .map(|i| {
                let job = CrawlJob::new(format!("https://example.com/{i}"));
                let id = store.create(job.clone());
                dispatcher.dispatch(id, job).unwrap();
                id
            })
            .collect();

        for id in ids {
            assert_eq!(wait_terminal(&store, id).await, TaskStatus::Completed);
        }
    }
}
