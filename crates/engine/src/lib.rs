// crates/engine/src/lib.rs
//! Crawl engine boundary for the crawl-gateway server.
//!
//! The gateway only ever talks to an engine through the [`CrawlEngine`] trait:
//! one call, `run_job`, which takes the submitted [`CrawlJob`] and either
//! produces a [`CrawlOutcome`] or fails with an [`EngineError`]. The engine
//! owns its own resource lifecycle (HTTP client, sessions) — the gateway never
//! reaches past this boundary.
//!
//! The production implementation is [`HttpEngine`], a plain-HTTP fetcher with
//! bounded deep-crawl support. Tests substitute deterministic fakes.

pub mod error;
pub mod http;
pub mod job;

pub use error::EngineError;
pub use http::HttpEngine;
pub use job::{CrawlJob, CrawlOutcome, CrawlStrategy};

use async_trait::async_trait;

/// The narrow contract between the gateway and whatever performs the crawl.
///
/// Implementations must be cheap to share (`Arc<dyn CrawlEngine>`) and safe to
/// invoke from any number of concurrently running jobs.
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    /// Run a single crawl job to completion, returning the produced artifacts.
    ///
    /// Any per-job resources (connections, render sessions) are acquired and
    /// released within this call.
    async fn run_job(&self, job: &CrawlJob) -> Result<CrawlOutcome, EngineError>;
}
