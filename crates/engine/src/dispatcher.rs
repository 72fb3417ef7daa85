// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission

use cronbell_adapters::{ComputeBackend, DispatchError};
use cronbell_core::{IdGen, JobDescription, JobHandle, ShortId, UuidIdGen};
use std::time::Duration;

/// Submits the deployed job description to the compute backend.
///
/// One submission per firing: no dedup window, no automatic retry. A
/// rejected or timed-out submission is a terminal failure for that firing,
/// surfaced in the logs and dropped; the next firing submits independently.
pub struct Dispatcher<B: ComputeBackend, G: IdGen = UuidIdGen> {
    backend: B,
    description: JobDescription,
    timeout: Duration,
    ids: G,
}

impl<B: ComputeBackend> Dispatcher<B> {
    pub fn new(backend: B, description: JobDescription, timeout: Duration) -> Self {
        Self::with_ids(backend, description, timeout, UuidIdGen)
    }
}

impl<B: ComputeBackend, G: IdGen> Dispatcher<B, G> {
    pub fn with_ids(backend: B, description: JobDescription, timeout: Duration, ids: G) -> Self {
        Self {
            backend,
            description,
            timeout,
            ids,
        }
    }

    pub fn description(&self) -> &JobDescription {
        &self.description
    }

    /// Submit one run.
    pub async fn submit(&self) -> Result<JobHandle, DispatchError> {
        // Client-side token correlating this firing's log lines; the
        // backend assigns the real job id.
        let firing_id = self.ids.next();
        let firing = firing_id.short(8);
        tracing::info!(job = %self.description.name, %firing, "submitting job");

        let result = tokio::time::timeout(self.timeout, self.backend.submit(&self.description))
            .await
            .unwrap_or(Err(DispatchError::Timeout {
                after: self.timeout,
            }));

        match &result {
            Ok(handle) => {
                tracing::info!(
                    job = %self.description.name,
                    %firing,
                    job_id = %handle.job_id,
                    queue = %handle.queue,
                    "job submitted"
                );
            }
            Err(e) => {
                tracing::warn!(
                    job = %self.description.name,
                    %firing,
                    error = %e,
                    "job submission failed"
                );
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
