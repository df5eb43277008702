// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ballast-core: pure data model for the ballast semaphore coordinator
//!
//! This crate provides:
//! - Semaphore definitions and the lookup seam that resolves them
//! - Holder records and the holder-list wire codec
//! - Store path and metrics key derivation
//! - Work items and job semaphore requirements
//!
//! No I/O lives here; everything is deterministic and synchronous.

pub mod definition;
pub mod holder;
pub mod path;
pub mod work;

pub use definition::{SemaphoreDefinition, SemaphoreSource, StaticSemaphores};
pub use holder::{decode_holders, encode_holders, HolderEntry, HolderRecord};
pub use path::{decode_segment, semaphore_path, stats_key, tenant_root, GLOBAL_ROOT};
pub use work::{Job, JobSemaphore, WorkItem};
