// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use crawl_gateway_engine::CrawlEngine;

use crate::config::Config;
use crate::tasks::{Dispatcher, InMemoryTaskStore, TaskStore};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Task records — the only shared mutable state in the process.
    pub store: Arc<dyn TaskStore>,
    /// Fire-and-forget job execution.
    pub dispatcher: Arc<Dispatcher>,
    /// Shared secret expected in the `X-API-Key` header.
    pub api_key: String,
}

impl AppState {
    /// Production state: in-memory store plus the given engine.
    pub fn new(config: &Config, engine: Arc<dyn CrawlEngine>) -> Arc<Self> {
        Self::with_store(config, Arc::new(InMemoryTaskStore::new()), engine)
    }

    /// State with an externally-owned store (tests keep a handle to inspect it).
    pub fn with_store(
        config: &Config,
        store: Arc<dyn TaskStore>,
        engine: Arc<dyn CrawlEngine>,
    ) -> Arc<Self> {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&store),
            engine,
            config.job_timeout,
        ));
        Arc::new(Self {
            start_time: Instant::now(),
            store,
            dispatcher,
            api_key: config.api_key.clone(),
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crawl_gateway_engine::{CrawlJob, CrawlOutcome, EngineError};

    struct NoopEngine;

    #[async_trait]
    impl CrawlEngine for NoopEngine {
        async fn run_job(&self, _job: &CrawlJob) -> Result<CrawlOutcome, EngineError> {
            Ok(CrawlOutcome {
                markdown: None,
                links: None,
                images: None,
            })
        }
    }

    #[tokio::test]
    async fn test_app_state_new() {
        let state = AppState::new(&Config::default(), Arc::new(NoopEngine));
        assert!(state.uptime_secs() < 1);
        assert_eq!(state.api_key, "development-key");
    }

    #[tokio::test]
    async fn test_with_store_shares_the_store() {
        let store = Arc::new(InMemoryTaskStore::new());
        let state = AppState::with_store(&Config::default(), store.clone(), Arc::new(NoopEngine));

        let id = state.store.create(CrawlJob::new("https://example.com"));
        // The external handle observes records created through the state.
        assert!(store.get(id).is_ok());
    }
}
