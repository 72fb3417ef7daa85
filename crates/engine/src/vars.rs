// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template variable construction

use cronbell_core::{Event, QueueId};
use serde_json::Value;
use std::collections::HashMap;

/// Flatten an event into template variables.
///
/// Scalar detail values are exposed as `detail.<field>`; arrays and nested
/// objects are not addressable from templates.
pub fn event_vars(event: &Event) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("source".to_string(), event.source.clone());
    vars.insert("detailType".to_string(), event.detail_type.clone());
    for (key, value) in &event.detail {
        if let Some(text) = scalar_to_string(value) {
            vars.insert(format!("detail.{key}"), text);
        }
    }
    vars
}

/// Static rule context, fixed at deployment time.
pub fn static_vars(job_name: &str, queue: &QueueId, rule_name: &str) -> HashMap<String, String> {
    HashMap::from([
        ("job.name".to_string(), job_name.to_string()),
        ("job.queue".to_string(), queue.as_str().to_string()),
        ("rule.name".to_string(), rule_name.to_string()),
    ])
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
