// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state-change events emitted by the compute backend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured state-change notification.
///
/// Events arrive on the ingest stream as JSON, are matched against the
/// deployed rule set, and are dropped after routing. Nothing is persisted;
/// each event is processed exactly once as delivered, and the upstream
/// stream is assumed at-least-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Origin system tag (e.g. "aws.batch").
    pub source: String,

    /// Event category (e.g. "Batch Job State Change").
    #[serde(rename = "detailType", alias = "detail-type")]
    pub detail_type: String,

    /// Open field map. Job state changes carry at least `status` and a
    /// `jobQueue` correlation field.
    #[serde(default)]
    pub detail: IndexMap<String, Value>,
}

impl Event {
    pub fn new(source: impl Into<String>, detail_type: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            detail_type: detail_type.into(),
            detail: IndexMap::new(),
        }
    }

    /// Add a detail field (builder style).
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }

    /// The `detail.status` field, when present and a string.
    pub fn status(&self) -> Option<&str> {
        self.detail.get("status").and_then(Value::as_str)
    }

    /// The `detail.jobQueue` correlation field, when present and a string.
    pub fn job_queue(&self) -> Option<&str> {
        self.detail.get("jobQueue").and_then(Value::as_str)
    }

    pub fn log_summary(&self) -> String {
        let mut s = format!("source={} type={:?}", self.source, self.detail_type);
        if let Some(status) = self.status() {
            s.push_str(&format!(" status={status}"));
        }
        if let Some(queue) = self.job_queue() {
            s.push_str(&format!(" queue={queue}"));
        }
        s
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
