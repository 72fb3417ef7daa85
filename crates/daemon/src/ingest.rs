// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend event-stream ingest.
//!
//! The compute backend pushes job state-change events as newline-delimited
//! JSON over TCP. Each connection runs on its own task so ingest never
//! blocks the engine loop; a malformed or oversized line is logged and
//! skipped so one bad producer cannot wedge the stream.

use crate::event_bus::EventBus;
use cronbell_core::Event;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, warn};

/// Maximum accepted line length (1 MB). State-change events are small;
/// anything larger is a protocol error.
const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Listener task for the backend's push-style event stream.
pub struct Ingest {
    listener: TcpListener,
    bus: EventBus,
}

impl Ingest {
    /// Bind the ingest listener.
    pub async fn bind(addr: &str, bus: EventBus) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, bus })
    }

    /// Actual bound address (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the process exits, spawning a task per
    /// stream.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let bus = self.bus.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_stream(stream, peer, bus).await {
                            debug!(peer = %peer, error = %e, "event stream closed");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            }
        }
    }
}

async fn handle_stream(
    stream: TcpStream,
    peer: SocketAddr,
    bus: EventBus,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        if line.len() > MAX_LINE_BYTES {
            warn!(peer = %peer, bytes = line.len(), "dropping oversized event line");
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(trimmed) {
            Ok(event) => {
                debug!(peer = %peer, event = %event.log_summary(), "event received");
                if bus.send(event).await.is_err() {
                    // Engine loop is gone; the process is shutting down.
                    return Ok(());
                }
            }
            Err(e) => {
                warn!(peer = %peer, error = %e, "dropping malformed event");
            }
        }
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
