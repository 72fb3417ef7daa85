// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification rule definitions.

use cronbell_core::EventPattern;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural payload template: a mapping with string values, where values
/// may carry `${...}` placeholders rendered per event.
pub type PayloadTemplate = IndexMap<String, String>;

/// One notification action attached to a rule, keyed by target name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyDef {
    /// Payload template rendered against the matched event plus static
    /// rule context.
    #[serde(default)]
    pub payload: PayloadTemplate,
}

/// A declarative match rule: an event pattern plus the targets to notify
/// when it matches.
///
/// Rules are fixed at deployment time. Multiple rules may match the same
/// event; they fire independently and in no guaranteed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    /// Rule name (injected from map key)
    #[serde(skip)]
    pub name: String,

    /// Predicate evaluated against every incoming event. String literals
    /// may reference static context (e.g. `${job.queue}`), resolved once
    /// at startup.
    #[serde(rename = "match")]
    pub pattern: EventPattern,

    /// Notification actions, keyed by target name.
    #[serde(default)]
    pub notify: IndexMap<String, NotifyDef>,
}
