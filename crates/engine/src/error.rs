// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for engine assembly

use cronbell_config::TemplateError;
use thiserror::Error;

/// Errors raised while assembling the router from deployment config.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("rule '{rule}' references unknown target '{target}'")]
    UnknownTarget { rule: String, target: String },

    #[error("rule '{rule}' pattern: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: TemplateError,
    },
}
