// crates/engine/src/http.rs
//! Plain-HTTP crawl engine.
//!
//! Fetches pages with reqwest, reduces HTML to a markdown-ish text rendering,
//! and extracts links/images with lightweight regexes. Deep crawls walk a
//! same-host frontier bounded by the job's `depth` and `max_pages`, ordered by
//! the job's [`CrawlStrategy`]. No JavaScript rendering — a browser-based
//! engine can slot in behind the same [`CrawlEngine`] trait.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex_lite::Regex;
use url::Url;

use crate::error::EngineError;
use crate::job::{CrawlJob, CrawlOutcome, CrawlStrategy};
use crate::CrawlEngine;

/// Per-request bound; the gateway enforces a whole-job timeout on top.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP-fetch implementation of [`CrawlEngine`].
pub struct HttpEngine {
    client: reqwest::Client,
}

impl HttpEngine {
    pub fn new() -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("crawl-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(EngineError::Client)?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &Url) -> Result<String, EngineError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| EngineError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| EngineError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CrawlEngine for HttpEngine {
    async fn run_job(&self, job: &CrawlJob) -> Result<CrawlOutcome, EngineError> {
        let base = parse_target(&job.url)?;
        let page_budget = if job.depth == 0 {
            1
        } else {
            job.max_pages.max(1) as usize
        };

        let mut frontier: Frontier = Frontier::new(job.strategy, job.user_query.as_deref());
        frontier.push(base.clone(), 0);

        let mut visited: HashSet<String> = HashSet::new();
        let mut sections: Vec<String> = Vec::new();
        let mut links: BTreeSet<String> = BTreeSet::new();
        let mut images: BTreeSet<String> = BTreeSet::new();

        while sections.len() < page_budget {
            let Some((url, url_depth)) = frontier.pop() else {
                break;
            };
            if !visited.insert(url.as_str().to_string()) {
                continue;
            }

            let html = match self.fetch(&url).await {
                Ok(html) => html,
                // The submitted target itself being unreachable fails the job;
                // a dead link discovered mid-crawl is just skipped.
                Err(e) if sections.is_empty() && url_depth == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "skipping unreachable page");
                    continue;
                }
            };

            let page_links = extract_links(&url, &html);
            if job.extract_links {
                links.extend(page_links.iter().map(|u| u.to_string()));
            }
            if job.extract_images {
                images.extend(extract_images(&url, &html));
            }

            sections.push(page_markdown(&url, &html));
            tracing::debug!(url = %url, depth = url_depth, "page crawled");

            if url_depth < job.depth {
                for link in page_links {
                    if link.host_str() == base.host_str() {
                        frontier.push(link, url_depth + 1);
                    }
                }
            }
        }

        Ok(CrawlOutcome {
            markdown: Some(sections.join("\n\n---\n\n")),
            links: job
                .extract_links
                .then(|| links.into_iter().collect()),
            images: job
                .extract_images
                .then(|| images.into_iter().collect()),
        })
    }
}

fn parse_target(raw: &str) -> Result<Url, EngineError> {
    let url = Url::parse(raw).map_err(|e| EngineError::UnsupportedUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(EngineError::UnsupportedUrl {
            url: raw.to_string(),
            reason: "only http and https are supported".to_string(),
        });
    }
    Ok(url)
}

/// Strategy-ordered crawl frontier.
struct Frontier<'a> {
    strategy: CrawlStrategy,
    query: Option<&'a str>,
    entries: VecDeque<(Url, u32)>,
}

impl<'a> Frontier<'a> {
    fn new(strategy: CrawlStrategy, query: Option<&'a str>) -> Self {
        Self {
            strategy,
            query,
            entries: VecDeque::new(),
        }
    }

    fn push(&mut self, url: Url, depth: u32) {
        self.entries.push_back((url, depth));
    }

    fn pop(&mut self) -> Option<(Url, u32)> {
        match self.strategy {
            CrawlStrategy::Bfs => self.entries.pop_front(),
            CrawlStrategy::Dfs => self.entries.pop_back(),
            CrawlStrategy::BestFirst => {
                let best = self
                    .entries
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, (url, _))| relevance(url, self.query))
                    .map(|(i, _)| i)?;
                self.entries.remove(best)
            }
        }
    }
}

/// How many query terms appear in the URL. Crude, but enough to steer a
/// best-first walk toward on-topic pages.
fn relevance(url: &Url, query: Option<&str>) -> usize {
    let Some(query) = query else { return 0 };
    let haystack = url.as_str().to_lowercase();
    query
        .split_whitespace()
        .filter(|term| haystack.contains(&term.to_lowercase()))
        .count()
}

fn href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)href\s*=\s*["']([^"'\s>]+)["']"#).expect("valid regex"))
}

fn img_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"'\s>]+)["']"#).expect("valid regex")
    })
}

/// Resolve every `href` in `html` against `base`, keeping http(s) URLs only.
fn extract_links(base: &Url, html: &str) -> Vec<Url> {
    let mut seen = HashSet::new();
    href_re()
        .captures_iter(html)
        .filter_map(|c| base.join(&c[1]).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|mut u| {
            u.set_fragment(None);
            u
        })
        .filter(|u| seen.insert(u.as_str().to_string()))
        .collect()
}

fn extract_images(base: &Url, html: &str) -> Vec<String> {
    img_src_re()
        .captures_iter(html)
        .filter_map(|c| base.join(&c[1]).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| u.to_string())
        .collect()
}

/// Reduce one page of HTML to a markdown-ish section headed by its title.
fn page_markdown(url: &Url, html: &str) -> String {
    static SCRIPT_STYLE: OnceLock<Regex> = OnceLock::new();
    static TITLE: OnceLock<Regex> = OnceLock::new();
    static BLOCK_END: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();

    let script_style = SCRIPT_STYLE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid regex")
    });
    let title_re = TITLE
        .get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
    let block_end = BLOCK_END.get_or_init(|| {
        Regex::new(r"(?i)</(p|div|li|tr|h[1-6])>|<br\s*/?>").expect("valid regex")
    });
    let tag = TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

    let stripped = script_style.replace_all(html, " ");
    let title = title_re
        .captures(&stripped)
        .map(|c| decode_entities(c[1].trim()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());

    let with_breaks = block_end.replace_all(&stripped, "\n");
    let text = decode_entities(&tag.replace_all(&with_breaks, " "));

    let body: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();

    format!("# {}\n\nSource: {}\n\n{}", title, url, body.join("\n"))
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
