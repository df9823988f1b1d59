// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot encoding: the whole workout collection as one JSON array.
//!
//! Each entry carries the stored fields plus the computed `pace`, which is
//! ignored when reading back. There is no schema version.

use crate::db::{keys, KeyValueStore, StoreError};
use crate::models::{WorkoutRecord, WorkoutView};

/// Serialize records in order.
pub fn encode(records: &[WorkoutRecord]) -> Result<String, StoreError> {
    let views: Vec<WorkoutView> = records.iter().map(WorkoutView::from).collect();
    serde_json::to_string(&views).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Parse a snapshot. `null` reads as an empty collection.
///
/// Only a snapshot that is not a JSON array is corrupt. Entries that do not
/// decode as records are skipped with a warning.
pub fn decode(raw: &str) -> Result<Vec<WorkoutRecord>, StoreError> {
    let entries: Option<Vec<serde_json::Value>> =
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let records = entries
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable saved workout");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Load the workout snapshot, if one was saved.
pub fn load(store: &dyn KeyValueStore) -> Result<Option<Vec<WorkoutRecord>>, StoreError> {
    store.get(keys::WORKOUTS)?.map(|raw| decode(&raw)).transpose()
}

/// Overwrite the workout snapshot.
pub fn save(store: &dyn KeyValueStore, records: &[WorkoutRecord]) -> Result<(), StoreError> {
    store.set(keys::WORKOUTS, &encode(records)?)
}
