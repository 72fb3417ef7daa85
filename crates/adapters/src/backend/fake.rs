// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake compute backend for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ComputeBackend, DispatchError};
use async_trait::async_trait;
use cronbell_core::{Event, IdGen, JobDescription, JobHandle, JobId, JobStatus, QueueId, SequentialIdGen};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct FakeBackendState {
    submissions: Vec<JobDescription>,
    reject_with: Option<String>,
    delay: Option<Duration>,
}

/// Fake compute backend that records submissions.
///
/// Configure rejection with [`reject_with`](FakeComputeBackend::reject_with)
/// or a response delay with [`delay`](FakeComputeBackend::delay) (for
/// timeout tests).
#[derive(Clone)]
pub struct FakeComputeBackend {
    queue: QueueId,
    ids: SequentialIdGen,
    inner: Arc<Mutex<FakeBackendState>>,
}

impl FakeComputeBackend {
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: QueueId::new(queue),
            ids: SequentialIdGen::new("job"),
            inner: Arc::new(Mutex::new(FakeBackendState {
                submissions: Vec::new(),
                reject_with: None,
                delay: None,
            })),
        }
    }

    /// Make every subsequent submission fail with a rejection.
    pub fn reject_with(&self, message: impl Into<String>) {
        self.inner.lock().reject_with = Some(message.into());
    }

    /// Clear a previously set rejection.
    pub fn recover(&self) {
        self.inner.lock().reject_with = None;
    }

    /// Delay every response (submissions still succeed afterwards).
    pub fn delay(&self, by: Duration) {
        self.inner.lock().delay = Some(by);
    }

    /// All recorded submissions.
    pub fn submissions(&self) -> Vec<JobDescription> {
        self.inner.lock().submissions.clone()
    }

    pub fn queue(&self) -> &QueueId {
        &self.queue
    }

    /// Canonical state-change event for a submitted run, shaped as the
    /// real backend emits it on the ingest stream.
    pub fn state_change(handle: &JobHandle, status: JobStatus) -> Event {
        Event::new("aws.batch", "Batch Job State Change")
            .with_detail("status", status.as_str())
            .with_detail("jobQueue", handle.queue.as_str())
            .with_detail("jobId", handle.job_id.as_str())
    }
}

#[async_trait]
impl ComputeBackend for FakeComputeBackend {
    async fn submit(&self, description: &JobDescription) -> Result<JobHandle, DispatchError> {
        let (reject, delay) = {
            let state = self.inner.lock();
            (state.reject_with.clone(), state.delay)
        };

        if let Some(by) = delay {
            tokio::time::sleep(by).await;
        }
        if let Some(message) = reject {
            return Err(DispatchError::Rejected {
                status: 400,
                message,
            });
        }

        self.inner.lock().submissions.push(description.clone());
        Ok(JobHandle {
            job_id: JobId::new(self.ids.next()),
            queue: self.queue.clone(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
