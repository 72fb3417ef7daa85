// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP compute backend.
//!
//! Speaks a minimal JSON submit API: `POST {endpoint}/v1/jobs` with the
//! job description and target queue; the backend replies with the assigned
//! job id. Authentication is a bearer token read from the environment at
//! startup so the credential stays out of the deployment file.

use super::{ComputeBackend, DispatchError};
use async_trait::async_trait;
use cronbell_config::BackendDef;
use cronbell_core::{JobDescription, JobHandle, JobId, QueueId};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct HttpComputeBackend {
    endpoint: String,
    queue: QueueId,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    #[serde(rename = "jobName")]
    job_name: &'a str,
    #[serde(rename = "jobQueue")]
    job_queue: &'a str,
    #[serde(flatten)]
    description: &'a JobDescription,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "jobId")]
    job_id: String,
}

impl HttpComputeBackend {
    /// Build the backend from its config definition.
    ///
    /// When `token_env` is set, the named variable must be present in the
    /// environment; a missing credential is a startup error, not a
    /// per-submission surprise.
    pub fn from_def(def: &BackendDef) -> Result<Self, DispatchError> {
        let token = match &def.token_env {
            Some(var) => Some(
                std::env::var(var)
                    .map_err(|_| DispatchError::Config(format!("env var not found: {var}")))?,
            ),
            None => None,
        };
        Ok(Self {
            endpoint: def.endpoint.trim_end_matches('/').to_string(),
            queue: QueueId::new(def.queue.clone()),
            token,
            client: reqwest::Client::new(),
        })
    }

    /// The queue this deployment submits to.
    pub fn queue(&self) -> &QueueId {
        &self.queue
    }

    fn submit_url(&self) -> String {
        format!("{}/v1/jobs", self.endpoint)
    }
}

#[async_trait]
impl ComputeBackend for HttpComputeBackend {
    async fn submit(&self, description: &JobDescription) -> Result<JobHandle, DispatchError> {
        let body = SubmitRequest {
            job_name: &description.name,
            job_queue: self.queue.as_str(),
            description,
        };

        let mut request = self.client.post(self.submit_url()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DispatchError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let accepted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;

        Ok(JobHandle {
            job_id: JobId::new(accepted.job_id),
            queue: self.queue.clone(),
        })
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
