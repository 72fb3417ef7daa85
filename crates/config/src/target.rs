// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification target definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An outbound notification endpoint (a chat webhook, typically).
///
/// Connection details resolve at startup: `${VAR}` references in `url` and
/// header values are read from the environment so credentials stay out of
/// the deployment file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDef {
    /// Target name (injected from map key)
    #[serde(skip)]
    pub name: String,

    /// Endpoint URL.
    pub url: String,

    /// HTTP method; POST when omitted.
    #[serde(default)]
    pub method: Option<String>,

    /// Extra headers sent with every delivery.
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Mute this target without deleting the rules that reference it.
    /// Matches are still evaluated and logged; deliveries are discarded.
    #[serde(default)]
    pub disabled: bool,
}
