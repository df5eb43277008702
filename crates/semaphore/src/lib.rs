// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! ballast-semaphore: distributed counting-semaphore coordinator
//!
//! This crate provides:
//! - [`SemaphoreHandler`] - acquire/release of semaphore slots across
//!   independent worker processes, coordinated purely through compare-and-swap
//!   writes against a shared versioned store
//! - Fire-and-forget collaborator seams for metrics gauges and release
//!   notifications
//!
//! The handler holds no state of its own; every operation re-reads the store,
//! so any number of handler instances interoperate safely.

pub mod error;
pub mod handler;
pub mod notify;
pub mod stats;

pub use error::SemaphoreError;
pub use handler::SemaphoreHandler;
pub use notify::{NoOpNotifier, NotifyError, ReleaseNotifier};
pub use stats::{NoOpStatsSink, StatsError, StatsSink};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use stats::FakeStatsSink;
