// crates/engine/src/error.rs
//! Engine-side failures.
//!
//! These never cross the HTTP surface directly: the dispatcher absorbs them
//! and records their `Display` form in the task's `error` field.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The submitted URL cannot be crawled at all (bad syntax, non-http scheme).
    #[error("unsupported URL `{url}`: {reason}")]
    UnsupportedUrl { url: String, reason: String },

    /// The request never produced a response (DNS, connect, read timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The target answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_url_display() {
        let err = EngineError::UnsupportedUrl {
            url: "ftp://example.com".to_string(),
            reason: "only http and https are supported".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported URL `ftp://example.com`: only http and https are supported"
        );
    }

    #[test]
    fn test_status_display() {
        let err = EngineError::Status {
            url: "https://example.com/missing".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(
            err.to_string(),
            "https://example.com/missing returned HTTP 404 Not Found"
        );
    }
}
