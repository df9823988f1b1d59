// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout list routes: create, read, edit, remove, sort, locate.

use crate::error::{AppError, Result};
use crate::routes::ApiJson;
use crate::models::{Coordinates, MapMarker, WorkoutForm, WorkoutView};
use crate::services::{MapView, SortCriterion, WorkoutList};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/map", get(get_map))
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/markers", get(list_markers))
        .route("/api/workouts/sort", post(sort_workouts))
        .route(
            "/api/workouts/{id}",
            get(get_workout).put(edit_workout).delete(remove_workout),
        )
        .route("/api/workouts/{id}/locate", get(locate_workout))
        .route("/api/session/end", post(end_session))
}

// ─── Listing ─────────────────────────────────────────────────

/// The full list in display order.
#[derive(Serialize)]
pub struct WorkoutListResponse {
    pub workouts: Vec<WorkoutView>,
    /// Id of the record currently being edited, if any
    pub editing: Option<String>,
}

impl WorkoutListResponse {
    fn from_list(list: &WorkoutList) -> Self {
        Self {
            workouts: list.records().iter().map(WorkoutView::from).collect(),
            editing: list.edit_session().map(|s| s.record_id.clone()),
        }
    }
}

/// Initial map view.
async fn get_map(State(state): State<Arc<AppState>>) -> Json<MapView> {
    Json(state.workouts.lock().await.map_view())
}

async fn list_workouts(State(state): State<Arc<AppState>>) -> Json<WorkoutListResponse> {
    let workouts = state.workouts.lock().await;
    Json(WorkoutListResponse::from_list(&workouts))
}

/// One marker per record, in list order.
async fn list_markers(State(state): State<Arc<AppState>>) -> Json<Vec<MapMarker>> {
    let workouts = state.workouts.lock().await;
    Json(workouts.records().iter().map(|r| r.marker()).collect())
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>> {
    let workouts = state.workouts.lock().await;
    let record = workouts
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Workout {id} not found")))?;
    Ok(Json(WorkoutView::from(record)))
}

async fn locate_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MapView>> {
    Ok(Json(state.workouts.lock().await.locate(&id)?))
}

// ─── Create / Edit ───────────────────────────────────────────

/// New workout at a clicked map position.
#[derive(Deserialize)]
struct CreateWorkoutRequest {
    coords: Coordinates,
    #[serde(flatten)]
    form: WorkoutForm,
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutView>)> {
    tracing::debug!(kind = %request.form.kind, "Creating workout");
    let record = state
        .workouts
        .lock()
        .await
        .create(request.coords, &request.form)?;
    Ok((StatusCode::CREATED, Json(WorkoutView::from(&record))))
}

async fn edit_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(form): ApiJson<WorkoutForm>,
) -> Result<Json<WorkoutView>> {
    let record = state.workouts.lock().await.edit(&id, form)?;
    Ok(Json(WorkoutView::from(&record)))
}

// ─── Remove ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct RemoveQuery {
    /// The user confirmed the removal
    #[serde(default)]
    confirm: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RemoveWorkoutResponse {
    pub removed: bool,
}

async fn remove_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<RemoveQuery>,
) -> Json<RemoveWorkoutResponse> {
    let removed = state
        .workouts
        .lock()
        .await
        .remove(&id, params.confirm)
        .is_some();
    Json(RemoveWorkoutResponse { removed })
}

// ─── Sort ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SortRequest {
    /// distance, duration, time or pace
    #[serde(default)]
    by: String,
}

async fn sort_workouts(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SortRequest>,
) -> Json<WorkoutListResponse> {
    let mut workouts = state.workouts.lock().await;
    workouts.sort(SortCriterion::parse(&request.by));
    Json(WorkoutListResponse::from_list(&workouts))
}

// ─── Session End ─────────────────────────────────────────────

/// Write the end-of-session snapshot (records in creation order).
async fn end_session(State(state): State<Arc<AppState>>) -> Result<Json<WorkoutListResponse>> {
    let mut workouts = state.workouts.lock().await;
    workouts.end_session()?;
    Ok(Json(WorkoutListResponse::from_list(&workouts)))
}
