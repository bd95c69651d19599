// crates/server/src/config.rs
//! Process-wide configuration, read once at startup.
//!
//! All task state is process-memory only and is lost on restart; the only
//! persistent inputs are these environment variables.

use std::time::Duration;

/// Default port for the gateway.
const DEFAULT_PORT: u16 = 8000;

/// Default shared-secret value, matching the original service's dev default.
const DEFAULT_API_KEY: &str = "development-key";

/// Default whole-job execution bound.
const DEFAULT_JOB_TIMEOUT_SECS: u64 = 300;

/// Runtime configuration for the gateway.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port.
    pub port: u16,
    /// Shared secret expected in the `X-API-Key` header.
    pub api_key: String,
    /// Bound after which a still-running job is force-failed.
    pub job_timeout: Duration,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `CRAWL_GATEWAY_PORT` or `PORT` — listen port
    /// - `API_KEY` — shared secret
    /// - `CRAWL_JOB_TIMEOUT_SECS` — job execution bound
    pub fn from_env() -> Self {
        let port = std::env::var("CRAWL_GATEWAY_PORT")
            .ok()
            .or_else(|| std::env::var("PORT").ok())
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_key = std::env::var("API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());

        let job_timeout = std::env::var("CRAWL_JOB_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS));

        Self {
            port,
            api_key,
            job_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: DEFAULT_API_KEY.to_string(),
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.api_key, "development-key");
        assert_eq!(config.job_timeout, Duration::from_secs(300));
    }
}
