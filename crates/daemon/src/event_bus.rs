// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for daemon communication.
//!
//! Pure transport: each backend event is processed exactly once as
//! delivered and nothing is persisted, so a bounded in-memory channel is
//! the whole mechanism. Ingest connections block on a full channel rather
//! than dropping events.

use cronbell_core::Event;
use thiserror::Error;
use tokio::sync::mpsc;

/// Returned when the engine side of the bus has shut down.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("event bus closed")]
pub struct BusClosed;

/// Sending half, cloned into every ingest connection.
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::Sender<Event>,
}

/// Receiving half, owned by the engine loop.
pub struct EventReader {
    rx: mpsc::Receiver<Event>,
}

/// Create a connected bus and reader.
pub fn event_bus(capacity: usize) -> (EventBus, EventReader) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventBus { tx }, EventReader { rx })
}

impl EventBus {
    /// Enqueue an event, waiting for capacity if the engine is behind.
    pub async fn send(&self, event: Event) -> Result<(), BusClosed> {
        self.tx.send(event).await.map_err(|_| BusClosed)
    }
}

impl EventReader {
    /// Next event, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
