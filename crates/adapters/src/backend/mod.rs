// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute backend adapters

mod http;

pub use http::HttpComputeBackend;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeComputeBackend;

use async_trait::async_trait;
use cronbell_core::{JobDescription, JobHandle};
use thiserror::Error;

/// Errors from job submission
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("submission rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("backend authentication failed")]
    Unauthorized,

    #[error("submission timed out after {after:?}")]
    Timeout { after: std::time::Duration },

    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("backend misconfigured: {0}")]
    Config(String),
}

/// The external worker pool that executes submitted jobs.
///
/// Submission either yields a handle correlating the run with the
/// accepting queue, or a typed rejection. Job lifecycle events flow back
/// separately, on the daemon's ingest stream.
#[async_trait]
pub trait ComputeBackend: Send + Sync {
    /// Submit the job description for one run.
    async fn submit(&self, description: &JobDescription) -> Result<JobHandle, DispatchError>;
}
