// crates/server/src/main.rs
//! Crawl-gateway server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use crawl_gateway_engine::HttpEngine;
use crawl_gateway_server::{create_app, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let engine = Arc::new(HttpEngine::new()?);
    let state = AppState::new(&config, engine);
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        port = config.port,
        job_timeout_secs = config.job_timeout.as_secs(),
        "crawl-gateway listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
