// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification target for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DeliveryError, NotifyTarget};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

struct FakeTargetState {
    delivered: Vec<serde_json::Value>,
    fail_with: Option<String>,
}

/// Fake notification target that records delivered payloads.
///
/// Set a failure message with [`FakeTarget::fail_with`] to make every
/// subsequent delivery return an error (nothing is recorded for failures).
#[derive(Clone)]
pub struct FakeTarget {
    name: String,
    inner: Arc<Mutex<FakeTargetState>>,
}

impl FakeTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(FakeTargetState {
                delivered: Vec::new(),
                fail_with: None,
            })),
        }
    }

    /// Make every subsequent delivery fail with this message.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.inner.lock().fail_with = Some(message.into());
    }

    /// Clear a previously set failure.
    pub fn recover(&self) {
        self.inner.lock().fail_with = None;
    }

    /// All payloads delivered so far.
    pub fn delivered(&self) -> Vec<serde_json::Value> {
        self.inner.lock().delivered.clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl NotifyTarget for FakeTarget {
    async fn deliver(&self, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let mut state = self.inner.lock();
        if let Some(message) = &state.fail_with {
            return Err(DeliveryError::Config(message.clone()));
        }
        state.delivered.push(payload.clone());
        Ok(())
    }

    fn kind(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
