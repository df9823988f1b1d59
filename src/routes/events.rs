// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render signal stream (server-sent events).

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{stream, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", get(stream_events))
}

/// Each render signal becomes one `render` event with a JSON payload.
///
/// The stream ends once shutdown begins so graceful shutdown can finish.
async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Render stream opened");
    let rx = state.events.subscribe();
    let shutdown = state.shutdown.clone();

    let events = stream::unfold((rx, shutdown), |(mut rx, shutdown)| async move {
        let event = next_event(&mut rx, &shutdown).await?;
        Some((Ok(event), (rx, shutdown)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

async fn next_event(
    rx: &mut broadcast::Receiver<crate::services::RenderSignal>,
    shutdown: &CancellationToken,
) -> Option<Event> {
    loop {
        let received = tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::debug!("Render stream closed for shutdown");
                return None;
            }
            received = rx.recv() => received,
        };

        match received {
            Ok(signal) => match Event::default().event("render").json_data(&signal) {
                Ok(event) => return Some(event),
                Err(e) => tracing::warn!(error = %e, "Failed to encode render signal"),
            },
            Err(RecvError::Lagged(skipped)) => {
                // The client missed signals; the next full replace catches it up.
                tracing::warn!(skipped, "Render stream lagged");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}
