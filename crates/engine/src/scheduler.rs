// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron firing schedule

use chrono::{DateTime, TimeZone};
use cronbell_config::ScheduleSpec;

/// A single due firing.
#[derive(Debug, Clone, PartialEq)]
pub struct Firing<Tz: TimeZone> {
    /// The calendar instant that matched the cron expression.
    pub due_at: DateTime<Tz>,
}

/// Tracks the deployment's single schedule and its next due instant.
///
/// Driven by the daemon's coarse tick: `poll` returns at most one firing
/// and re-arms from `now`, so instants that elapse while the process is
/// down or stalled are lost rather than queued (no catch-up, no backlog).
#[derive(Debug)]
pub struct CronScheduler<Tz: TimeZone> {
    spec: ScheduleSpec,
    next_due: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> CronScheduler<Tz> {
    /// Arm the schedule from `now`. Instants before startup never fire.
    pub fn new(spec: ScheduleSpec, now: DateTime<Tz>) -> Self {
        let next_due = spec.next_after(&now);
        Self { spec, next_due }
    }

    /// Fire if the next due instant has arrived.
    ///
    /// Overlap with a previous run is deliberately allowed: each firing is
    /// an independent submission.
    pub fn poll(&mut self, now: DateTime<Tz>) -> Option<Firing<Tz>> {
        let due = self.next_due.clone()?;
        if due > now {
            return None;
        }
        self.next_due = self.spec.next_after(&now);
        Some(Firing { due_at: due })
    }

    /// The next instant the schedule will fire, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Tz>> {
        self.next_due.clone()
    }

    pub fn spec(&self) -> &ScheduleSpec {
        &self.spec
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
