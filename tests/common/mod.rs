// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use workout_tracker::config::Config;
use workout_tracker::db::{KeyValueStore, MemoryStore};
use workout_tracker::routes::create_router;
use workout_tracker::AppState;

/// Create a test app backed by an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_store(Box::new(MemoryStore::new()))
}

/// Create a test app over an existing store (restores whatever it holds).
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Box<dyn KeyValueStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::new(Config::test_default(), store).expect("Failed to build test state"),
    );
    (create_router(state.clone()), state)
}

/// Send a request and decode the JSON response body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Create a running workout through the API and return its id.
#[allow(dead_code)]
pub async fn create_running(app: &axum::Router, distance: f64, duration: f64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/workouts",
        Some(serde_json::json!({
            "coords": [18.2, 76.4],
            "type": "running",
            "distance": distance,
            "duration": duration,
            "cadence": 175
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().unwrap().to_string()
}
