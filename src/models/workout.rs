// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout record model.
//!
//! A record is a tagged variant: shared fields plus a per-kind payload.
//! Pace is never stored on the record; it is recomputed from distance and
//! duration by [`compute_pace`], so records read back from a snapshot behave
//! exactly like freshly created ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::number::lenient_f64;
use crate::time_utils::{deserialize_timestamp, month_day, serialize_timestamp};

/// Number of trailing epoch-millisecond digits kept in a record id.
const ID_DIGITS_MODULUS: u64 = 10_000_000_000;

/// Workout kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A map position, serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

/// Kind-specific payload. The `type` tag is flattened into the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running {
        /// Steps per minute
        #[serde(rename = "cadence", deserialize_with = "lenient_f64")]
        cadence_spm: f64,
    },
    Cycling {
        /// Meters, may be negative
        #[serde(rename = "elevationGain", deserialize_with = "lenient_f64")]
        elevation_gain_m: f64,
    },
}

impl WorkoutDetails {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// A single logged workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Assigned once at construction
    pub id: String,
    #[serde(
        rename = "createdAt",
        alias = "date",
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "coords")]
    pub coordinates: Coordinates,
    #[serde(rename = "distance", deserialize_with = "lenient_f64")]
    pub distance_km: f64,
    #[serde(rename = "duration", deserialize_with = "lenient_f64")]
    pub duration_min: f64,
    /// "<Kind> on <Month> <Day>", fixed at construction
    pub description: String,
    #[serde(rename = "clicks", default)]
    pub interaction_count: u32,
    #[serde(flatten)]
    pub details: WorkoutDetails,
}

impl WorkoutRecord {
    /// Build a record. No validation happens here; callers check inputs first.
    pub fn new(
        id: String,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        details: WorkoutDetails,
    ) -> Self {
        let description = describe(details.kind(), created_at);
        Self {
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            description,
            interaction_count: 0,
            details,
        }
    }

    pub fn running(
        id: String,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Self {
        Self::new(
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            WorkoutDetails::Running { cadence_spm },
        )
    }

    pub fn cycling(
        id: String,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::new(
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            WorkoutDetails::Cycling { elevation_gain_m },
        )
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    /// Running: min/km. Cycling: km/h.
    pub fn pace(&self) -> f64 {
        compute_pace(self.kind(), self.distance_km, self.duration_min)
    }

    /// What the map collaborator needs to draw a marker and popup.
    pub fn marker(&self) -> MapMarker {
        MapMarker {
            coordinates: self.coordinates,
            description: self.description.clone(),
            kind: self.kind(),
        }
    }
}

/// Pace for a kind. Arithmetic is unconditional: zero distance gives an
/// infinite running pace.
pub fn compute_pace(kind: WorkoutKind, distance_km: f64, duration_min: f64) -> f64 {
    match kind {
        WorkoutKind::Running => duration_min / distance_km,
        WorkoutKind::Cycling => distance_km / (duration_min / 60.0),
    }
}

fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), month_day(created_at))
}

/// Marker projection for the map collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    #[serde(rename = "coords")]
    pub coordinates: Coordinates,
    /// Popup text
    pub description: String,
    /// Selects the popup style
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
}

/// A record as rendered and persisted: stored fields plus computed pace.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutView {
    #[serde(flatten)]
    pub record: WorkoutRecord,
    pub pace: f64,
}

impl From<&WorkoutRecord> for WorkoutView {
    fn from(record: &WorkoutRecord) -> Self {
        Self {
            pace: record.pace(),
            record: record.clone(),
        }
    }
}

/// Form values submitted to create or edit a record.
///
/// Both kind-specific fields are always present, as on the entry form; only
/// the one matching `kind` is used. Missing fields read as blank inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutForm {
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cadence: f64,
    #[serde(rename = "elevationGain", default, deserialize_with = "lenient_f64")]
    pub elevation_gain: f64,
}

impl WorkoutForm {
    pub fn running(distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance,
            duration,
            cadence,
            elevation_gain: 0.0,
        }
    }

    pub fn cycling(distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance,
            duration,
            cadence: 0.0,
            elevation_gain,
        }
    }

    /// Pre-fill a form from an existing record.
    pub fn from_record(record: &WorkoutRecord) -> Self {
        match record.details {
            WorkoutDetails::Running { cadence_spm } => {
                Self::running(record.distance_km, record.duration_min, cadence_spm)
            }
            WorkoutDetails::Cycling { elevation_gain_m } => {
                Self::cycling(record.distance_km, record.duration_min, elevation_gain_m)
            }
        }
    }

    /// The kind-specific payload selected by `kind`.
    pub fn details(&self) -> WorkoutDetails {
        match self.kind {
            WorkoutKind::Running => WorkoutDetails::Running {
                cadence_spm: self.cadence,
            },
            WorkoutKind::Cycling => WorkoutDetails::Cycling {
                elevation_gain_m: self.elevation_gain,
            },
        }
    }
}

/// Issues record ids from the creation timestamp.
///
/// Ids are the last ten digits of the epoch-millisecond clock. Two ids asked
/// for in the same millisecond are kept apart by bumping the second one.
#[derive(Debug, Default, Clone)]
pub struct RecordIdGenerator {
    last_millis: u64,
}

impl RecordIdGenerator {
    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let issued = if millis > self.last_millis {
            millis
        } else {
            self.last_millis + 1
        };
        self.last_millis = issued;
        format!("{:010}", issued % ID_DIGITS_MODULUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_running_pace_and_description() {
        let created = at("2024-06-09T08:30:00Z");
        let run = WorkoutRecord::running(
            "1".to_string(),
            created,
            Coordinates::new(18.2, 76.4),
            5.0,
            25.0,
            180.0,
        );

        assert_eq!(run.kind(), WorkoutKind::Running);
        assert_eq!(run.pace(), 5.0);
        assert_eq!(run.description, "Running on June 9");
        assert_eq!(run.interaction_count, 0);
    }

    #[test]
    fn test_cycling_pace_and_description() {
        let ride = WorkoutRecord::cycling(
            "2".to_string(),
            at("2024-12-25T15:00:00Z"),
            Coordinates::new(18.2, 76.4),
            30.0,
            90.0,
            -120.0,
        );

        assert_eq!(ride.kind(), WorkoutKind::Cycling);
        assert_eq!(ride.pace(), 30.0 / (90.0 / 60.0));
        assert_eq!(ride.description, "Cycling on December 25");
    }

    #[test]
    fn test_pace_is_exact_for_assorted_inputs() {
        let cases = [(1.0, 1.0), (3.7, 19.3), (42.195, 180.5), (0.4, 2.25)];
        for (distance, duration) in cases {
            assert_eq!(
                compute_pace(WorkoutKind::Running, distance, duration),
                duration / distance
            );
            assert_eq!(
                compute_pace(WorkoutKind::Cycling, distance, duration),
                distance / (duration / 60.0)
            );
        }
    }

    #[test]
    fn test_zero_distance_gives_infinite_running_pace() {
        assert!(compute_pace(WorkoutKind::Running, 0.0, 10.0).is_infinite());
    }

    #[test]
    fn test_snapshot_shape() {
        let run = WorkoutRecord::running(
            "0123456789".to_string(),
            at("2024-01-01T10:00:00Z"),
            Coordinates::new(18.2, 76.4),
            5.0,
            25.0,
            180.0,
        );
        let json = serde_json::to_value(WorkoutView::from(&run)).unwrap();

        assert_eq!(json["id"], "0123456789");
        assert_eq!(json["createdAt"], "2024-01-01T10:00:00.000Z");
        assert_eq!(json["coords"], serde_json::json!([18.2, 76.4]));
        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["duration"], 25.0);
        assert_eq!(json["type"], "running");
        assert_eq!(json["cadence"], 180.0);
        assert_eq!(json["clicks"], 0);
        assert_eq!(json["pace"], 5.0);
        assert!(json.get("elevationGain").is_none());
    }

    #[test]
    fn test_reads_legacy_browser_entry() {
        // Shape written by the browser app, including string values from an edit.
        let raw = r#"{
            "date": "2024-02-03T07:15:00.000Z",
            "id": "6952100123",
            "clicks": 0,
            "coords": [18.211778, 76.455029],
            "distance": "7",
            "duration": "35",
            "elevationGain": 120,
            "type": "cycling",
            "description": "Cycling on February 3",
            "pace": 12
        }"#;
        let record: WorkoutRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.kind(), WorkoutKind::Cycling);
        assert_eq!(record.distance_km, 7.0);
        assert_eq!(record.duration_min, 35.0);
        assert_eq!(
            record.details,
            WorkoutDetails::Cycling {
                elevation_gain_m: 120.0
            }
        );
        assert_eq!(record.pace(), 7.0 / (35.0 / 60.0));
    }

    #[test]
    fn test_marker_projection() {
        let run = WorkoutRecord::running(
            "1".to_string(),
            at("2024-06-09T08:30:00Z"),
            Coordinates::new(1.0, 2.0),
            5.0,
            25.0,
            170.0,
        );
        let marker = run.marker();
        assert_eq!(marker.coordinates, Coordinates::new(1.0, 2.0));
        assert_eq!(marker.description, run.description);
        assert_eq!(marker.kind, WorkoutKind::Running);
    }

    #[test]
    fn test_form_selects_payload_by_kind() {
        let mut form = WorkoutForm::running(5.0, 25.0, 180.0);
        form.elevation_gain = 99.0;
        assert_eq!(form.details(), WorkoutDetails::Running { cadence_spm: 180.0 });

        form.kind = WorkoutKind::Cycling;
        assert_eq!(
            form.details(),
            WorkoutDetails::Cycling {
                elevation_gain_m: 99.0
            }
        );
    }

    #[test]
    fn test_form_accepts_string_inputs() {
        let form: WorkoutForm =
            serde_json::from_str(r#"{"type":"running","distance":"5","duration":"25","cadence":"180"}"#)
                .unwrap();
        assert_eq!(form, WorkoutForm::running(5.0, 25.0, 180.0));
    }

    #[test]
    fn test_id_generator_keeps_ids_apart_within_one_millisecond() {
        let mut ids = RecordIdGenerator::default();
        let now = at("2024-01-01T10:00:00Z");

        let first = ids.next_id(now);
        let second = ids.next_id(now);

        assert_ne!(first, second);
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 10);
        assert_eq!(
            first,
            format!("{:010}", now.timestamp_millis() as u64 % ID_DIGITS_MODULUS)
        );
    }
}
