// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edit session routes.
//!
//! Opening an edit form takes the single edit lock; a second form cannot be
//! opened until the first is saved or discarded.

use crate::error::{AppError, Result};
use crate::models::{WorkoutForm, WorkoutView};
use crate::routes::ApiJson;
use crate::services::EditSession;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts/{id}/edit", post(begin_edit))
        .route(
            "/api/edit",
            get(get_edit).put(update_draft).delete(discard_edit),
        )
        .route("/api/edit/save", post(save_edit))
}

async fn begin_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EditSession>> {
    let mut workouts = state.workouts.lock().await;
    let session = workouts.begin_edit(&id)?;
    Ok(Json(session.clone()))
}

async fn get_edit(State(state): State<Arc<AppState>>) -> Result<Json<EditSession>> {
    let workouts = state.workouts.lock().await;
    workouts
        .edit_session()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No workout is being edited".to_string()))
}

async fn update_draft(
    State(state): State<Arc<AppState>>,
    ApiJson(draft): ApiJson<WorkoutForm>,
) -> Result<Json<EditSession>> {
    let mut workouts = state.workouts.lock().await;
    let session = workouts.update_draft(draft)?;
    Ok(Json(session.clone()))
}

/// Take the submitted form as the final draft and commit it.
async fn save_edit(
    State(state): State<Arc<AppState>>,
    ApiJson(draft): ApiJson<WorkoutForm>,
) -> Result<Json<WorkoutView>> {
    let mut workouts = state.workouts.lock().await;
    workouts.update_draft(draft)?;
    let record = workouts.save_edit()?;
    Ok(Json(WorkoutView::from(&record)))
}

#[derive(Serialize)]
pub struct DiscardEditResponse {
    pub discarded: Option<String>,
}

async fn discard_edit(State(state): State<Arc<AppState>>) -> Json<DiscardEditResponse> {
    let discarded = state.workouts.lock().await.discard_edit();
    Json(DiscardEditResponse {
        discarded: discarded.map(|s| s.record_id),
    })
}
