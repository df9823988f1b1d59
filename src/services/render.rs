// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render signals sent to the UI layer.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::models::WorkoutView;

/// What the UI should redraw.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderSignal {
    /// Draw one more list entry and marker.
    Append { record: WorkoutView },
    /// Drop every entry and marker, then draw these in order.
    Replace { records: Vec<WorkoutView> },
}

/// Outbound port for render signals.
pub trait RenderSink: Send + Sync {
    fn render(&self, signal: RenderSignal);
}

/// Fans signals out to every connected event stream.
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<RenderSignal>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<RenderSignal>) -> Self {
        Self { tx }
    }
}

impl RenderSink for BroadcastSink {
    fn render(&self, signal: RenderSignal) {
        // No subscribers just means no UI is connected right now.
        if let Ok(receivers) = self.tx.send(signal) {
            tracing::trace!(receivers, "Render signal sent");
        }
    }
}

/// Keeps every signal, for inspection in tests.
#[derive(Clone, Default)]
pub struct RecordingSink {
    signals: Arc<Mutex<Vec<RenderSignal>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far.
    pub fn signals(&self) -> Vec<RenderSignal> {
        self.signals
            .lock()
            .map(|signals| signals.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.clear();
        }
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, signal: RenderSignal) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(signal);
        }
    }
}
