// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the compute backend and notification targets.

pub mod backend;
pub mod notify;

pub use backend::{ComputeBackend, DispatchError, HttpComputeBackend};
pub use notify::{DeliveryError, NoOpTarget, NotifyTarget, WebhookTarget};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use backend::FakeComputeBackend;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeTarget;
