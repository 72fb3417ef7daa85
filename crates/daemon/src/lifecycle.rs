// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon assembly from deployment config.
//!
//! Everything that can fail at startup fails here, before the engine loop
//! begins: credentials resolve, the schedule parses, and the router
//! compiles its fixed rule set.

use chrono::{DateTime, TimeZone};
use cronbell_adapters::{
    DeliveryError, DispatchError, HttpComputeBackend, NoOpTarget, NotifyTarget, WebhookTarget,
};
use cronbell_config::{parse_duration, Config, DurationError, ScheduleError};
use cronbell_core::QueueId;
use cronbell_engine::{BuildError, CronScheduler, Dispatcher, Router, RouterContext};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// The assembled daemon, ready for the engine loop.
pub struct Daemon<Tz: TimeZone> {
    pub scheduler: CronScheduler<Tz>,
    pub dispatcher: Arc<Dispatcher<HttpComputeBackend>>,
    pub router: Arc<Router>,
    /// Ingest listen address from config.
    pub listen: String,
}

impl<Tz: TimeZone> std::fmt::Debug for Daemon<Tz> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("listen", &self.listen)
            .finish_non_exhaustive()
    }
}

/// Errors that prevent the daemon from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("schedule: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("settings: {0}")]
    Duration(#[from] DurationError),

    #[error("config must declare exactly one job")]
    MissingJob,

    #[error("target '{name}': {source}")]
    Target {
        name: String,
        #[source]
        source: DeliveryError,
    },

    #[error("backend: {0}")]
    Backend(#[from] DispatchError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Build the daemon from a validated config.
pub fn build<Tz: TimeZone>(
    config: &Config,
    now: DateTime<Tz>,
) -> Result<Daemon<Tz>, StartupError> {
    let spec = config.schedule_spec()?;
    let submit_timeout = parse_duration(&config.settings.submit_timeout)?;
    let deliver_timeout = parse_duration(&config.settings.deliver_timeout)?;
    let job = config.job().ok_or(StartupError::MissingJob)?.clone();

    let mut targets: HashMap<String, Arc<dyn NotifyTarget>> =
        HashMap::with_capacity(config.targets.len());
    for (name, def) in &config.targets {
        if def.disabled {
            tracing::warn!(target = %name, "target disabled; deliveries will be discarded");
            targets.insert(name.clone(), Arc::new(NoOpTarget::new()));
            continue;
        }
        let target = WebhookTarget::from_def(def).map_err(|source| StartupError::Target {
            name: name.clone(),
            source,
        })?;
        targets.insert(name.clone(), Arc::new(target));
    }

    let context = RouterContext {
        job_name: job.name.clone(),
        queue: QueueId::new(config.backend.queue.clone()),
    };
    let router = Router::build(&config.rules, &targets, &context, deliver_timeout)?;

    let backend = HttpComputeBackend::from_def(&config.backend)?;
    let dispatcher = Dispatcher::new(backend, job, submit_timeout);

    tracing::info!(
        schedule = %spec,
        rules = router.rule_count(),
        targets = config.targets.len(),
        "daemon assembled"
    );

    Ok(Daemon {
        scheduler: CronScheduler::new(spec, now),
        dispatcher: Arc::new(dispatcher),
        router: Arc::new(router),
        listen: config.settings.listen.clone(),
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
