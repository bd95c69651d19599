// crates/server/src/tasks/store.rs
//! Concurrency-safe task store — the only shared mutable state in the gateway.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crawl_gateway_engine::CrawlJob;
use thiserror::Error;

use super::types::{IllegalTransition, TaskId, TaskRecord, Transition};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("task {id}: {source}")]
    IllegalTransition {
        id: TaskId,
        #[source]
        source: IllegalTransition,
    },
}

/// Create/read/update access to task records.
///
/// An explicit interface (rather than a bare map) so tests can substitute a
/// deterministic fake and a persistent store can slot in later unchanged.
pub trait TaskStore: Send + Sync {
    /// Insert a fresh `Pending` record and return its id. Never fails: id
    /// collisions are treated as impossible for random v4 ids.
    fn create(&self, job: CrawlJob) -> TaskId;

    /// Snapshot of the current record.
    fn get(&self, id: TaskId) -> Result<TaskRecord, StoreError>;

    /// Atomically apply a transition and return the committed record.
    ///
    /// A concurrent reader sees either the record before the transition or
    /// after it, never a partially-applied state.
    fn update(&self, id: TaskId, transition: Transition) -> Result<TaskRecord, StoreError>;
}

/// In-memory [`TaskStore`].
///
/// The outer lock guards map structure only; each record carries its own lock,
/// so transitions on different tasks never contend. Records live for the
/// lifetime of the process — eviction is deliberately out of scope.
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Arc<RwLock<TaskRecord>>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records ever created. Useful for tests and introspection.
    pub fn len(&self) -> usize {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, id: TaskId) -> Result<Arc<RwLock<TaskRecord>>, StoreError> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, job: CrawlJob) -> TaskId {
        let record = TaskRecord::new(job);
        let id = record.id;
        let prev = self
            .tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(RwLock::new(record)));
        debug_assert!(prev.is_none(), "v4 id collision");
        id
    }

    fn get(&self, id: TaskId) -> Result<TaskRecord, StoreError> {
        let entry = self.entry(id)?;
        // A poisoned record lock can only mean a panic mid-transition; the
        // record itself is still a consistent snapshot, so recover the guard.
        let record = entry.read().unwrap_or_else(PoisonError::into_inner);
        Ok(record.clone())
    }

    fn update(&self, id: TaskId, transition: Transition) -> Result<TaskRecord, StoreError> {
        let entry = self.entry(id)?;
        let mut record = entry.write().unwrap_or_else(PoisonError::into_inner);
        let next = record
            .apply(transition)
            .map_err(|source| StoreError::IllegalTransition { id, source })?;
        *record = next.clone();
        Ok(next)
    }
}
