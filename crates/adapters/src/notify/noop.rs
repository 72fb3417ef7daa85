// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification target.

use super::{DeliveryError, NotifyTarget};
use async_trait::async_trait;

/// Target that silently discards all payloads.
///
/// Used when a deployment wants a rule's matches logged but not delivered.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpTarget;

impl NoOpTarget {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyTarget for NoOpTarget {
    async fn deliver(&self, _payload: &serde_json::Value) -> Result<(), DeliveryError> {
        Ok(())
    }

    fn kind(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
