// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative event patterns.
//!
//! A pattern names the fields it constrains. Each constrained field carries
//! either a list of literal values (membership test) or a nested map that
//! recurses into the event's corresponding object. Fields the pattern does
//! not name are wildcards; a pattern never matches when a field it names is
//! absent from the event (fail-closed).

use crate::event::Event;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Constraint on a single event field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternField {
    /// Matches when the event value (or any element of an array value)
    /// equals one of these literals.
    AnyOf(Vec<Value>),
    /// Recurses into a nested object.
    Nested(IndexMap<String, PatternField>),
}

impl PatternField {
    fn matches(&self, value: &Value) -> bool {
        match self {
            PatternField::AnyOf(literals) => match value {
                // Multi-valued event fields match on any element.
                Value::Array(elems) => elems.iter().any(|e| literals.contains(e)),
                scalar => literals.contains(scalar),
            },
            PatternField::Nested(fields) => match value {
                Value::Object(map) => fields
                    .iter()
                    .all(|(key, field)| map.get(key).is_some_and(|v| field.matches(v))),
                _ => false,
            },
        }
    }

    fn map_literals<E>(
        &self,
        f: &mut impl FnMut(&str) -> Result<String, E>,
    ) -> Result<PatternField, E> {
        match self {
            PatternField::AnyOf(literals) => {
                let mut mapped = Vec::with_capacity(literals.len());
                for literal in literals {
                    mapped.push(match literal {
                        Value::String(s) => Value::String(f(s)?),
                        other => other.clone(),
                    });
                }
                Ok(PatternField::AnyOf(mapped))
            }
            PatternField::Nested(fields) => {
                let mut mapped = IndexMap::with_capacity(fields.len());
                for (key, field) in fields {
                    mapped.insert(key.clone(), field.map_literals(f)?);
                }
                Ok(PatternField::Nested(mapped))
            }
        }
    }
}

/// Declarative predicate over an [`Event`].
///
/// Matching is exact over the specified subset: literal-or-list membership
/// only, no substring or regex semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,

    #[serde(
        default,
        rename = "detail_type",
        alias = "detailType",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail_type: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<IndexMap<String, PatternField>>,
}

impl EventPattern {
    /// Evaluate the pattern against an event.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(sources) = &self.source {
            if !sources.iter().any(|s| s == &event.source) {
                return false;
            }
        }
        if let Some(types) = &self.detail_type {
            if !types.iter().any(|t| t == &event.detail_type) {
                return false;
            }
        }
        if let Some(detail) = &self.detail {
            for (key, field) in detail {
                match event.detail.get(key) {
                    Some(value) if field.matches(value) => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// True when no field is constrained (such a pattern matches every
    /// event; config validation rejects it).
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.detail_type.is_none()
            && self.detail.as_ref().map_or(true, |d| d.is_empty())
    }

    /// Rewrite every string literal through `f`, preserving structure.
    ///
    /// Used at deployment time to interpolate static context (e.g. the job
    /// queue identifier) into pattern literals.
    pub fn map_literals<E>(
        &self,
        mut f: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<EventPattern, E> {
        let source = match &self.source {
            Some(values) => Some(
                values
                    .iter()
                    .map(|v| f(v))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
            None => None,
        };
        let detail_type = match &self.detail_type {
            Some(values) => Some(
                values
                    .iter()
                    .map(|v| f(v))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
            None => None,
        };
        let detail = match &self.detail {
            Some(fields) => {
                let mut mapped = IndexMap::with_capacity(fields.len());
                for (key, field) in fields {
                    mapped.insert(key.clone(), field.map_literals(&mut f)?);
                }
                Some(mapped)
            }
            None => None,
        };
        Ok(EventPattern {
            source,
            detail_type,
            detail,
        })
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
