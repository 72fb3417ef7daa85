// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payload template rendering.
//!
//! Templates carry `${name}` placeholders referencing event fields
//! (`${detail.status}`) or static rule context (`${job.queue}`). Rendering
//! is pure and fails closed: an unresolvable placeholder is an error, not
//! a pass-through, so a bad reference surfaces as an observable failure
//! instead of reaching the notification endpoint verbatim.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Regex pattern for ${variable_name} or ${namespace.variable_name}
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_-]*)*)\}")
        .expect("constant regex pattern is valid")
});

/// Errors from template rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template references unknown field '{0}'")]
    MissingField(String),
}

/// Render `${name}` placeholders from the vars map.
///
/// Every placeholder must resolve; the first unknown name is returned as a
/// [`TemplateError::MissingField`].
pub fn render(template: &str, vars: &HashMap<String, String>) -> Result<String, TemplateError> {
    let mut missing: Option<String> = None;
    let rendered = VAR_PATTERN.replace_all(template, |caps: &regex::Captures| {
        let name = &caps[1];
        match vars.get(name) {
            Some(value) => value.clone(),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });
    match missing {
        Some(name) => Err(TemplateError::MissingField(name)),
        None => Ok(rendered.into_owned()),
    }
}

/// Render a structural payload template into a JSON object.
///
/// Each value is rendered with [`render`]; keys pass through untouched.
pub fn render_payload(
    template: &IndexMap<String, String>,
    vars: &HashMap<String, String>,
) -> Result<Value, TemplateError> {
    let mut payload = serde_json::Map::with_capacity(template.len());
    for (key, text) in template {
        payload.insert(key.clone(), Value::String(render(text, vars)?));
    }
    Ok(Value::Object(payload))
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
