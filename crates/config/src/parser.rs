// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config parsing (TOML, HCL, and JSON)

use crate::duration::parse_duration;
use crate::schedule::{ScheduleError, ScheduleSpec};
use crate::{RuleDef, TargetDef};
use cronbell_core::JobDescription;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Hcl,
    Json,
}

impl Format {
    /// Detect format from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Format::Toml),
            Some("hcl") => Some(Format::Hcl),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// Errors that can occur during config parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config for {location}: {message}")]
    InvalidConfig { location: String, message: String },
}

/// Errors from loading a config file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unrecognized config extension for {0} (expected .hcl, .toml, or .json)")]
    UnknownFormat(PathBuf),
}

/// The deployed recurrence rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleDef {
    /// 5-field cron expression (minute hour day month weekday).
    #[serde(default)]
    pub cron: String,
}

/// Compute backend coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendDef {
    /// Base URL of the backend's submit API.
    #[serde(default)]
    pub endpoint: String,

    /// Queue that accepts submissions. Stable for the deployment; exposed
    /// to rules and templates as `${job.queue}`.
    #[serde(default)]
    pub queue: String,

    /// Environment variable holding the backend auth token.
    #[serde(default)]
    pub token_env: Option<String>,
}

/// Runtime tuning knobs, all optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Address the event-stream ingest listener binds.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Timeout for one job submission.
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout: String,

    /// Timeout for one notification delivery.
    #[serde(default = "default_deliver_timeout")]
    pub deliver_timeout: String,
}

fn default_listen() -> String {
    "127.0.0.1:4710".to_string()
}

fn default_submit_timeout() -> String {
    "30s".to_string()
}

fn default_deliver_timeout() -> String {
    "10s".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            submit_timeout: default_submit_timeout(),
            deliver_timeout: default_deliver_timeout(),
        }
    }
}

/// A parsed deployment config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleDef,

    #[serde(default, alias = "job")]
    pub jobs: IndexMap<String, JobDescription>,

    #[serde(default)]
    pub backend: BackendDef,

    #[serde(default, alias = "target")]
    pub targets: IndexMap<String, TargetDef>,

    #[serde(default, alias = "rule")]
    pub rules: IndexMap<String, RuleDef>,

    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// The single deployed job (validation guarantees exactly one).
    pub fn job(&self) -> Option<&JobDescription> {
        self.jobs.values().next()
    }

    /// Parse the validated cron expression.
    pub fn schedule_spec(&self) -> Result<ScheduleSpec, ScheduleError> {
        self.schedule.cron.parse()
    }
}

/// Parse a config from TOML content (convenience wrapper)
pub fn parse_config(content: &str) -> Result<Config, ParseError> {
    parse_config_with_format(content, Format::Toml)
}

/// Parse a config from the given content in the specified format
pub fn parse_config_with_format(content: &str, format: Format) -> Result<Config, ParseError> {
    // 1. Serde does the heavy lifting
    let mut config: Config = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Hcl => hcl::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };

    // 2. Name fixup — inject map keys into .name fields
    for (name, job) in &mut config.jobs {
        job.name = name.clone();
    }
    for (name, target) in &mut config.targets {
        target.name = name.clone();
    }
    for (name, rule) in &mut config.rules {
        rule.name = name.clone();
    }

    // 3. Schedule must be present and parse
    if config.schedule.cron.trim().is_empty() {
        return Err(invalid("schedule.cron", "cron expression is required"));
    }
    if let Err(e) = config.schedule.cron.parse::<ScheduleSpec>() {
        return Err(invalid("schedule.cron", &e.to_string()));
    }

    // 4. Exactly one job
    match config.jobs.len() {
        1 => {}
        0 => return Err(invalid("job", "exactly one job block is required")),
        n => {
            return Err(invalid(
                "job",
                &format!("exactly one job block is required, found {n}"),
            ))
        }
    }

    // 5. Job sanity — image set, retries pinned at zero
    for (name, job) in &config.jobs {
        if job.image.trim().is_empty() {
            return Err(invalid(
                &format!("job.{name}.image"),
                "container image is required",
            ));
        }
        if job.retry_attempts != 0 {
            return Err(invalid(
                &format!("job.{name}.retry_attempts"),
                "automatic retries are not supported; retry_attempts must be 0",
            ));
        }
    }

    // 6. Backend coordinates
    if config.backend.endpoint.trim().is_empty() {
        return Err(invalid("backend.endpoint", "endpoint URL is required"));
    }
    if config.backend.queue.trim().is_empty() {
        return Err(invalid("backend.queue", "queue name is required"));
    }

    // 7. Timeouts parse
    for (location, value) in [
        ("settings.submit_timeout", &config.settings.submit_timeout),
        ("settings.deliver_timeout", &config.settings.deliver_timeout),
    ] {
        if let Err(e) = parse_duration(value) {
            return Err(invalid(location, &e.to_string()));
        }
    }

    // 8. Rules — non-empty pattern, at least one action, targets resolve
    for (rule_name, rule) in &config.rules {
        if rule.pattern.is_empty() {
            return Err(invalid(
                &format!("rule.{rule_name}.match"),
                "pattern must constrain at least one field",
            ));
        }
        if rule.notify.is_empty() {
            return Err(invalid(
                &format!("rule.{rule_name}"),
                "at least one notify block is required",
            ));
        }
        for target_name in rule.notify.keys() {
            if !config.targets.contains_key(target_name) {
                return Err(invalid(
                    &format!("rule.{rule_name}.notify.{target_name}"),
                    &format!(
                        "references unknown target '{}'; available targets: {}",
                        target_name,
                        sorted_keys(&config.targets),
                    ),
                ));
            }
        }
    }

    // 9. Warn on targets no rule references
    for name in config.targets.keys() {
        if !config.rules.values().any(|r| r.notify.contains_key(name)) {
            tracing::warn!("target '{}' is not referenced by any rule", name);
        }
    }

    Ok(config)
}

/// Load a config file, detecting the format from its extension.
pub fn load_config(path: &Path) -> Result<Config, LoadError> {
    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path)?;
    Ok(parse_config_with_format(&content, format)?)
}

fn invalid(location: &str, message: &str) -> ParseError {
    ParseError::InvalidConfig {
        location: location.to_string(),
        message: message.to_string(),
    }
}

fn sorted_keys<V>(map: &IndexMap<String, V>) -> String {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys.join(", ")
}

#[cfg(test)]
#[path = "parser_tests/mod.rs"]
mod tests;
