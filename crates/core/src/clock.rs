// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction.
//!
//! Cron evaluation is calendar arithmetic, so the clock deals in UTC wall
//! time rather than monotonic instants. `FakeClock` lets tests drive
//! firings deterministically.

use chrono::{DateTime, Utc};

/// Source of wall-clock time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }
}

/// Production clock backed by system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests.
///
/// Starts at the Unix epoch unless constructed with [`FakeClock::at`].
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FakeClock {
    now: std::sync::Arc<parking_lot::Mutex<DateTime<Utc>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    pub fn new() -> Self {
        Self::at(DateTime::UNIX_EPOCH)
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Arc::new(parking_lot::Mutex::new(now)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: std::time::Duration) {
        let delta = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        let mut now = self.now.lock();
        *now += delta;
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
