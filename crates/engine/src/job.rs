// crates/engine/src/job.rs
//! Job input and outcome types shared by the gateway and its engines.

use serde::{Deserialize, Serialize};

/// Frontier ordering for deep crawls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStrategy {
    /// Breadth-first: closest pages first.
    #[default]
    Bfs,
    /// Depth-first: follow a branch as far as the depth bound allows.
    Dfs,
    /// Best-first: pages whose URL matches the `user_query` terms first.
    #[serde(rename = "bestfirst")]
    BestFirst,
}

/// Parameters of a submitted crawl. Immutable once submitted.
///
/// Wire-compatible with the original gateway API: all fields except `url`
/// carry defaults, so a minimal submission is `{"url": "https://..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlJob {
    /// Target URL. The only required field.
    pub url: String,
    /// Link-follow depth; 0 crawls the target page alone.
    #[serde(default)]
    pub depth: u32,
    /// Page budget for deep crawls (ignored when `depth` is 0).
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub strategy: CrawlStrategy,
    /// Whether a browser-based engine should run headless. The plain HTTP
    /// engine has no browser and carries this through untouched.
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_true")]
    pub extract_links: bool,
    #[serde(default)]
    pub extract_images: bool,
    /// Free-text query used by the best-first strategy to rank the frontier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
}

impl CrawlJob {
    /// A job for `url` with every other field at its wire default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            max_pages: default_max_pages(),
            strategy: CrawlStrategy::default(),
            headless: true,
            extract_links: true,
            extract_images: false,
            user_query: None,
        }
    }
}

fn default_max_pages() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

/// Artifacts produced by a completed crawl.
///
/// `links`/`images` are `None` (not empty) when extraction was not requested,
/// matching the original API's response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// Markdown-ish rendering of the crawled page(s).
    pub markdown: Option<String>,
    pub links: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}
