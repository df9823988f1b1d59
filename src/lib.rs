// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: log running and cycling sessions against map locations
//!
//! This crate provides the backend for a map-based workout log: the record
//! model, the list manager that creates, edits, removes and sorts records,
//! snapshot persistence, and a small JSON API for the map UI.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::KeyValueStore;
use error::AppError;
use services::{BroadcastSink, MapView, RenderSignal, WorkoutList};
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

/// Buffered render signals per event stream subscriber.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Shared application state.
///
/// The workout list sits behind one mutex, so every operation runs to
/// completion before the next one starts.
pub struct AppState {
    pub config: Config,
    pub workouts: Mutex<WorkoutList>,
    pub events: broadcast::Sender<RenderSignal>,
    /// Cancelled when the server starts shutting down; open event streams end.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build the state and restore the saved workouts.
    ///
    /// Fails when the configuration has no initial map location.
    pub fn new(config: Config, store: Box<dyn KeyValueStore>) -> Result<Self, AppError> {
        let center = config.map_center.ok_or(AppError::LocationUnavailable)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut workouts = WorkoutList::new(
            MapView::new(center, config.map_zoom),
            store,
            Box::new(BroadcastSink::new(events.clone())),
        );
        workouts.restore();

        Ok(Self {
            config,
            workouts: Mutex::new(workouts),
            events,
            shutdown: CancellationToken::new(),
        })
    }
}
