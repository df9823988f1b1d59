// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod render;
pub mod workouts;

pub use render::{BroadcastSink, RecordingSink, RenderSignal, RenderSink};
pub use workouts::{EditSession, MapView, SortCriterion, WorkoutList, DEFAULT_ZOOM};
