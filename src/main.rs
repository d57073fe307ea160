// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tutorhub API Server
//!
//! Serves accounts, classes, class requests, profiles and reviews to
//! REST-mode clients.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tutorhub::{config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Tutorhub API");

    match &config.data_dir {
        Some(dir) => tracing::info!(path = %dir.display(), "Using file-backed store"),
        None => tracing::warn!("DATA_DIR not set, data will not survive a restart"),
    }

    // Build shared state
    let port = config.port;
    let state = Arc::new(AppState::new(config)?);

    // Build router
    let app = tutorhub::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    // Fall back to crate debug + info everywhere when RUST_LOG is unset or invalid
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tutorhub=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
