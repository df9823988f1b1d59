// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout list management.
//!
//! [`WorkoutList`] owns the ordered collection of records and mediates every
//! change to it:
//! 1. Validate form input
//! 2. Mutate the collection (create, edit, remove, sort)
//! 3. Write the snapshot to the store
//! 4. Send a render signal to the UI
//!
//! Only one record may be under edit at a time. The open edit is an explicit
//! [`EditSession`]; trying to open a second one fails before anything changes.

use serde::Serialize;

use crate::db::{snapshot, KeyValueStore};
use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, RecordIdGenerator, WorkoutForm, WorkoutKind, WorkoutRecord, WorkoutView,
};
use crate::services::render::{RenderSignal, RenderSink};
use crate::time_utils::now_millis;

/// Default map zoom level.
pub const DEFAULT_ZOOM: u8 = 13;

/// Where the map should look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapView {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// Sort order for the list. Always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    Distance,
    Duration,
    /// Creation time
    Time,
    Pace,
}

impl SortCriterion {
    /// Parse a sort selection. Anything unrecognized sorts by pace.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "distance" => SortCriterion::Distance,
            "duration" => SortCriterion::Duration,
            "time" => SortCriterion::Time,
            _ => SortCriterion::Pace,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Distance => "distance",
            SortCriterion::Duration => "duration",
            SortCriterion::Time => "time",
            SortCriterion::Pace => "pace",
        }
    }
}

/// An open, uncommitted edit of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditSession {
    pub record_id: String,
    /// Scratch copy of the edited fields
    pub draft: WorkoutForm,
}

/// The ordered workout collection and its persistence.
pub struct WorkoutList {
    records: Vec<WorkoutRecord>,
    editing: Option<EditSession>,
    ids: RecordIdGenerator,
    map: MapView,
    store: Box<dyn KeyValueStore>,
    sink: Box<dyn RenderSink>,
}

impl WorkoutList {
    /// Create an empty list. A map view is required: without an initial
    /// location there is nowhere to place workouts.
    pub fn new(map: MapView, store: Box<dyn KeyValueStore>, sink: Box<dyn RenderSink>) -> Self {
        Self {
            records: Vec::new(),
            editing: None,
            ids: RecordIdGenerator::default(),
            map,
            store,
            sink,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────

    pub fn records(&self) -> &[WorkoutRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, record_id: &str) -> Option<&WorkoutRecord> {
        self.records.iter().find(|r| r.id == record_id)
    }

    /// Initial map view.
    pub fn map_view(&self) -> MapView {
        self.map
    }

    /// Map view centered on a record.
    pub fn locate(&self, record_id: &str) -> Result<MapView> {
        let record = self.get(record_id).ok_or_else(|| not_found(record_id))?;
        Ok(MapView::new(record.coordinates, self.map.zoom))
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    // ─── Create ──────────────────────────────────────────────────

    /// Validate the form and append a new record at `coordinates`.
    pub fn create(&mut self, coordinates: Coordinates, form: &WorkoutForm) -> Result<WorkoutRecord> {
        validate_form(form)?;

        let now = now_millis();
        let id = self.fresh_id(now);
        let record = WorkoutRecord::new(
            id,
            now,
            coordinates,
            form.distance,
            form.duration,
            form.details(),
        );

        tracing::info!(
            record_id = %record.id,
            kind = %record.kind(),
            distance_km = record.distance_km,
            duration_min = record.duration_min,
            "Workout created"
        );

        self.records.push(record.clone());
        self.sync();
        self.sink.render(RenderSignal::Append {
            record: WorkoutView::from(&record),
        });
        Ok(record)
    }

    // ─── Edit ────────────────────────────────────────────────────

    /// Open an edit session on a record, pre-filled from its current values.
    pub fn begin_edit(&mut self, record_id: &str) -> Result<&EditSession> {
        if let Some(open) = &self.editing {
            return Err(AppError::ConcurrentEdit {
                editing: open.record_id.clone(),
            });
        }

        let record = self.get(record_id).ok_or_else(|| not_found(record_id))?;
        let session = EditSession {
            record_id: record.id.clone(),
            draft: WorkoutForm::from_record(record),
        };

        tracing::debug!(record_id, "Edit session opened");
        Ok(self.editing.insert(session))
    }

    /// Replace the draft of the open session without committing it.
    pub fn update_draft(&mut self, draft: WorkoutForm) -> Result<&EditSession> {
        let session = self.editing.as_mut().ok_or_else(no_open_edit)?;
        session.draft = draft;
        Ok(session)
    }

    /// Commit the open session's draft.
    ///
    /// Invalid input leaves the session open so it can be corrected. If the
    /// record disappeared meanwhile the session is closed.
    pub fn save_edit(&mut self) -> Result<WorkoutRecord> {
        let session = self.editing.as_ref().ok_or_else(no_open_edit)?;
        let record_id = session.record_id.clone();
        let draft = session.draft.clone();

        match self.apply_edit(&record_id, &draft) {
            Ok(record) => {
                self.editing = None;
                Ok(record)
            }
            Err(err @ AppError::NotFound(_)) => {
                tracing::warn!(record_id = %record_id, "Edited workout no longer exists");
                self.editing = None;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Close the open session without saving. Returns the discarded session.
    pub fn discard_edit(&mut self) -> Option<EditSession> {
        let discarded = self.editing.take();
        if let Some(session) = &discarded {
            tracing::debug!(record_id = %session.record_id, "Edit session discarded");
        }
        discarded
    }

    /// Edit a record in one step.
    ///
    /// Same kind: distance, duration and the kind-specific field change in
    /// place. Different kind: the record is replaced, at the same position and
    /// coordinates, by a new record with a new id and description.
    pub fn edit(&mut self, record_id: &str, form: WorkoutForm) -> Result<WorkoutRecord> {
        let open = self.editing.as_ref().map(|s| s.record_id.clone());
        match open {
            Some(open) if open == record_id => {
                self.update_draft(form)?;
                self.save_edit()
            }
            Some(open) => Err(AppError::ConcurrentEdit { editing: open }),
            None => self.apply_edit(record_id, &form),
        }
    }

    fn apply_edit(&mut self, record_id: &str, form: &WorkoutForm) -> Result<WorkoutRecord> {
        let index = self
            .position(record_id)
            .ok_or_else(|| not_found(record_id))?;
        validate_form(form)?;

        let updated = if self.records[index].kind() == form.kind {
            let record = &mut self.records[index];
            record.distance_km = form.distance;
            record.duration_min = form.duration;
            record.details = form.details();
            tracing::info!(record_id, kind = %form.kind, "Workout edited in place");
            record.clone()
        } else {
            let now = now_millis();
            let id = self.fresh_id(now);
            let replacement = WorkoutRecord::new(
                id,
                now,
                self.records[index].coordinates,
                form.distance,
                form.duration,
                form.details(),
            );
            tracing::info!(
                old_id = record_id,
                new_id = %replacement.id,
                kind = %form.kind,
                "Workout replaced after kind change"
            );
            self.records[index] = replacement.clone();
            replacement
        };

        self.sync();
        self.render_all();
        Ok(updated)
    }

    // ─── Remove ──────────────────────────────────────────────────

    /// Remove a record once the user has confirmed.
    ///
    /// Without confirmation nothing happens at all. An unknown id is a no-op
    /// that still re-renders.
    pub fn remove(&mut self, record_id: &str, confirmed: bool) -> Option<WorkoutRecord> {
        if !confirmed {
            tracing::debug!(record_id, "Removal not confirmed");
            return None;
        }

        let removed = self.position(record_id).map(|i| self.records.remove(i));
        match &removed {
            Some(_) => {
                tracing::info!(record_id, "Workout removed");
                if self
                    .editing
                    .as_ref()
                    .is_some_and(|s| s.record_id == record_id)
                {
                    self.editing = None;
                }
            }
            None => tracing::debug!(record_id, "Workout to remove not found"),
        }

        self.sync();
        self.render_all();
        removed
    }

    // ─── Sort ────────────────────────────────────────────────────

    /// Stable ascending sort by the given criterion.
    pub fn sort(&mut self, criterion: SortCriterion) {
        match criterion {
            SortCriterion::Distance => self
                .records
                .sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km)),
            SortCriterion::Duration => self
                .records
                .sort_by(|a, b| a.duration_min.total_cmp(&b.duration_min)),
            SortCriterion::Time => self.records.sort_by_key(|r| r.created_at),
            SortCriterion::Pace => self.records.sort_by(|a, b| a.pace().total_cmp(&b.pace())),
        }

        tracing::debug!(criterion = criterion.as_str(), "Workouts sorted");
        self.sync();
        self.render_all();
    }

    // ─── Persistence ─────────────────────────────────────────────

    /// Replace the collection with the stored snapshot.
    ///
    /// A missing or unreadable snapshot yields an empty collection. Saved
    /// records that would fail validation are dropped, so every record kept
    /// writes back as a readable snapshot. Each restored record is rendered
    /// in order.
    pub fn restore(&mut self) -> usize {
        let records = match snapshot::load(self.store.as_ref()) {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::debug!("No saved workouts");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved workouts unreadable, starting empty");
                Vec::new()
            }
        };

        self.records = records
            .into_iter()
            .filter(|record| match validate_form(&WorkoutForm::from_record(record)) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(record_id = %record.id, error = %e, "Dropping invalid saved workout");
                    false
                }
            })
            .collect();
        self.editing = None;
        for record in &self.records {
            self.sink.render(RenderSignal::Append {
                record: WorkoutView::from(record),
            });
        }

        tracing::info!(count = self.records.len(), "Workouts restored");
        self.records.len()
    }

    /// Overwrite the stored snapshot with the current collection.
    pub fn persist_snapshot(&self) -> Result<()> {
        snapshot::save(self.store.as_ref(), &self.records)?;
        Ok(())
    }

    /// Final write at the end of a session: records are put in creation
    /// order and the store is cleared before the snapshot is written.
    pub fn end_session(&mut self) -> Result<()> {
        self.records.sort_by_key(|r| r.created_at);
        self.store.clear()?;
        self.persist_snapshot()?;
        tracing::info!(count = self.records.len(), "Session snapshot written");
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────────

    fn position(&self, record_id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == record_id)
    }

    /// Next id that no current record uses, including restored ones.
    fn fresh_id(&mut self, now: chrono::DateTime<chrono::Utc>) -> String {
        loop {
            let id = self.ids.next_id(now);
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Write failures are reported but never undo the change.
    fn sync(&self) {
        if let Err(e) = self.persist_snapshot() {
            tracing::warn!(error = %e, "Failed to save workouts");
        }
    }

    fn render_all(&self) {
        self.sink.render(RenderSignal::Replace {
            records: self.records.iter().map(WorkoutView::from).collect(),
        });
    }
}

/// Check form input against the rules for its kind.
///
/// Distance and duration must be finite and positive. Running cadence must be
/// finite and positive. Cycling elevation gain only has to be finite.
pub fn validate_form(form: &WorkoutForm) -> Result<()> {
    require_positive("distance", form.distance)?;
    require_positive("duration", form.duration)?;
    match form.kind {
        WorkoutKind::Running => require_positive("cadence", form.cadence),
        WorkoutKind::Cycling => require_finite("elevation gain", form.elevation_gain),
    }
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field} must be a finite number")))
    }
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field} must be a positive number")))
    }
}

fn not_found(record_id: &str) -> AppError {
    AppError::NotFound(format!("Workout {record_id} not found"))
}

fn no_open_edit() -> AppError {
    AppError::NotFound("No workout is being edited".to_string())
}
