// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! ballast-store: versioned hierarchical key-value store abstraction
//!
//! The coordinator talks to its store through the [`KvStore`] seam; the
//! version token returned by every read and checked by every write is the
//! only concurrency-control primitive in the system.

pub mod kv;
pub mod memory;
pub mod traced;

pub use kv::{KvError, KvStore, Version};
pub use memory::MemoryStore;
pub use traced::TracedStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, KvCall};
