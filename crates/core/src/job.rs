// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job description, handle, and backend status vocabulary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

crate::define_id! {
    /// Backend-assigned identifier for one submitted run.
    pub struct JobId;
}

crate::define_id! {
    /// Identifier of the queue that accepted a submission.
    ///
    /// Stable for the lifetime of a deployment; rules and payload templates
    /// reference it as static context.
    pub struct QueueId;
}

/// Compute resources requested for every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// vCPU units.
    pub cpu: u32,
    /// Memory in MiB.
    #[serde(rename = "memory")]
    pub memory_mib: u32,
}

/// The unit of work: created at deploy time, immutable, submitted unchanged
/// on every firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    /// Job name (injected from the config map key).
    #[serde(skip)]
    pub name: String,

    /// Container image reference.
    pub image: String,

    #[serde(flatten)]
    pub resources: ResourceRequest,

    /// Plain environment variables.
    #[serde(default)]
    pub env: IndexMap<String, String>,

    /// Environment name → external secret locator. The backend resolves and
    /// injects the secret value at container start; this system never sees
    /// the plaintext.
    #[serde(default)]
    pub secrets: IndexMap<String, String>,

    /// Maximum automatic retry attempts. Fixed at zero for this system;
    /// config validation rejects anything else.
    #[serde(default)]
    pub retry_attempts: u32,

    /// Log stream prefix for the backend's logging sink.
    #[serde(default)]
    pub log_prefix: Option<String>,
}

/// Correlates a submitted run with the queue that accepted it.
///
/// Created on submission, lives for the duration of the run, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: JobId,
    pub queue: QueueId,
}

/// Backend job lifecycle states.
///
/// The router matches on raw status strings; this enum exists for the
/// backend adapters and tests that speak the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Submitted,
    Pending,
    Runnable,
    Starting,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::Pending => "PENDING",
            JobStatus::Runnable => "RUNNABLE",
            JobStatus::Starting => "STARTING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// True for the two end states a run can reach.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unrecognized status strings.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

impl std::str::FromStr for JobStatus {
    type Err = ParseJobStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMITTED" => Ok(JobStatus::Submitted),
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNABLE" => Ok(JobStatus::Runnable),
            "STARTING" => Ok(JobStatus::Starting),
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCEEDED" => Ok(JobStatus::Succeeded),
            "FAILED" => Ok(JobStatus::Failed),
            other => Err(ParseJobStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
