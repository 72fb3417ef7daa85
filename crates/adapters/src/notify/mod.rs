// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification target adapters

mod noop;
mod webhook;

pub use noop::NoOpTarget;
pub use webhook::WebhookTarget;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTarget;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("delivery timed out after {after:?}")]
    Timeout { after: std::time::Duration },

    #[error("target misconfigured: {0}")]
    Config(String),
}

/// An outbound notification endpoint.
///
/// Implementations deliver one rendered payload per call and report
/// failure to the caller; no adapter retries on its own. Object-safe so a
/// deployment can mix target kinds behind one router.
#[async_trait]
pub trait NotifyTarget: Send + Sync {
    /// Deliver a rendered payload.
    async fn deliver(&self, payload: &serde_json::Value) -> Result<(), DeliveryError>;

    /// Target kind for logs (e.g. "webhook").
    fn kind(&self) -> &str;
}
