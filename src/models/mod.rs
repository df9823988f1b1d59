// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod number;
pub mod workout;

pub use workout::{
    compute_pace, Coordinates, MapMarker, RecordIdGenerator, WorkoutDetails, WorkoutForm,
    WorkoutKind, WorkoutRecord, WorkoutView,
};
