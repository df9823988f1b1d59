// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Tracker API Server
//!
//! Serves the workout list to the map UI and keeps the snapshot on disk
//! across restarts.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker::{config::Config, db::FileStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Workout Tracker API");

    // Without an initial location the map cannot load and nothing can be created.
    if config.map_center.is_none() {
        tracing::error!("No initial location: set MAP_CENTER=\"lat,lng\"");
    }

    // Open the snapshot store
    let store = FileStore::open(&config.data_dir).context("Failed to open snapshot store")?;

    // Build shared state (restores saved workouts)
    let state = Arc::new(
        AppState::new(config.clone(), Box::new(store))
            .context("Failed to build application state")?,
    );
    let restored = state.workouts.lock().await.len();
    tracing::info!(count = restored, "Workout list ready");

    // Build router
    let app = workout_tracker::routes::create_router(state.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .context("Server error")?;

    // Final snapshot, in creation order
    if let Err(e) = state.workouts.lock().await.end_session() {
        tracing::warn!(error = %e, "Failed to write final snapshot");
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(state: Arc<AppState>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
    // Event streams never end on their own.
    state.shutdown.cancel();
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("workout_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
