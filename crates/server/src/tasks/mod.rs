// crates/server/src/tasks/mod.rs
//! Asynchronous task lifecycle: store, state machine, and dispatcher.
//!
//! - [`TaskStore`] / [`InMemoryTaskStore`] — concurrency-safe record storage
//! - [`TaskRecord`] / [`Transition`] — the status state machine
//! - [`Dispatcher`] — fire-and-forget execution, exactly once per id

pub mod dispatcher;
pub mod store;
pub mod types;

pub use dispatcher::{DispatchError, Dispatcher};
pub use store::{InMemoryTaskStore, StoreError, TaskStore};
pub use types::{
    CrawlResultResponse, TaskId, TaskRecord, TaskStatus, TaskStatusResponse, Transition,
};
