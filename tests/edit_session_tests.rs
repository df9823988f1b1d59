// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edit session API tests.
//!
//! Only one edit form may be open at a time; the lock must hold across
//! separate requests.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_running, create_test_app, send};

#[tokio::test]
async fn test_begin_edit_prefills_draft() {
    let (app, _) = create_test_app();
    let id = create_running(&app, 5.0, 25.0).await;

    let (status, body) = send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record_id"], id.as_str());
    assert_eq!(body["draft"]["type"], "running");
    assert_eq!(body["draft"]["distance"], 5.0);
    assert_eq!(body["draft"]["cadence"], 175.0);

    let (_, list) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(list["editing"], id.as_str());
}

#[tokio::test]
async fn test_second_edit_is_rejected_and_first_draft_survives() {
    let (app, state) = create_test_app();
    let first = create_running(&app, 5.0, 25.0).await;
    let second = create_running(&app, 8.0, 40.0).await;

    let (status, _) = send(&app, "POST", &format!("/api/workouts/{first}/edit"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/edit",
        Some(json!({"type": "running", "distance": "6", "duration": "28", "cadence": "178"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", &format!("/api/workouts/{second}/edit"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "edit_in_progress");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/workouts/{second}"),
        Some(json!({"type": "running", "distance": 1, "duration": 5, "cadence": 170})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/api/edit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record_id"], first.as_str());
    assert_eq!(body["draft"]["distance"], 6.0);

    // Nothing committed yet.
    let workouts = state.workouts.lock().await;
    assert_eq!(workouts.get(&first).unwrap().distance_km, 5.0);
    assert_eq!(workouts.get(&second).unwrap().distance_km, 8.0);
}

#[tokio::test]
async fn test_save_commits_and_releases_lock() {
    let (app, state) = create_test_app();
    let id = create_running(&app, 5.0, 25.0).await;
    let other = create_running(&app, 8.0, 40.0).await;

    send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/edit/save",
        Some(json!({"type": "running", "distance": "0", "duration": "30", "cadence": "170"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, "GET", "/api/edit", None).await;
    assert_eq!(status, StatusCode::OK, "invalid save keeps the form open");

    let (status, body) = send(
        &app,
        "POST",
        "/api/edit/save",
        Some(json!({"type": "running", "distance": "6", "duration": "30", "cadence": "170"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["distance"], 6.0);
    assert_eq!(body["pace"], 5.0);

    let (status, _) = send(&app, "GET", "/api/edit", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", &format!("/api/workouts/{other}/edit"), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(state.workouts.lock().await.get(&id).unwrap().distance_km, 6.0);
}

#[tokio::test]
async fn test_discard_releases_lock_without_changes() {
    let (app, state) = create_test_app();
    let id = create_running(&app, 5.0, 25.0).await;

    send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;
    send(
        &app,
        "PUT",
        "/api/edit",
        Some(json!({"type": "cycling", "distance": 40, "duration": 90, "elevationGain": 300})),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/api/edit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["discarded"], id.as_str());

    let (_, body) = send(&app, "DELETE", "/api/edit", None).await;
    assert!(body["discarded"].is_null());

    let workouts = state.workouts.lock().await;
    let record = workouts.get(&id).unwrap();
    assert_eq!(record.distance_km, 5.0);
    assert!(workouts.edit_session().is_none());
}

#[tokio::test]
async fn test_edit_unknown_workout() {
    let (app, _) = create_test_app();

    let (status, _) = send(&app, "POST", "/api/workouts/missing/edit", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/workouts/missing",
        Some(json!({"type": "running", "distance": 5, "duration": 25, "cadence": 170})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/edit/save",
        Some(json!({"type": "running", "distance": 5, "duration": 25, "cadence": 170})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_draft_leaves_session_untouched() {
    let (app, _) = create_test_app();
    let id = create_running(&app, 5.0, 25.0).await;
    send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/edit",
        Some(json!({"type": "rowing", "distance": 6, "duration": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (_, body) = send(&app, "GET", "/api/edit", None).await;
    assert_eq!(body["draft"]["distance"], 5.0);
}
