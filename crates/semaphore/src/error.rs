// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the semaphore coordinator

use ballast_store::KvError;
use thiserror::Error;

/// Errors surfaced by semaphore operations
///
/// Version conflicts never appear here; they are retried inside the handler.
/// Capacity exhaustion is not an error either - `acquire` reports it as
/// `Ok(false)`.
#[derive(Debug, Error)]
pub enum SemaphoreError {
    /// The layout has no definition for this name; a caller configuration
    /// error, never silently ignored
    #[error("unknown semaphore: {0}")]
    UnknownSemaphore(String),
    /// Store transport or backend failure
    #[error("store error: {0}")]
    Store(#[from] KvError),
    /// The holder list at a path did not parse
    #[error("corrupt holder list at {path}: {source}")]
    Codec {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
