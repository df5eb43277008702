// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned key-value store trait
//!
//! Paths are absolute, `/`-separated, hierarchical. Every node carries a
//! version token; a write must present the version it read. A write with a
//! stale version fails with [`KvError::VersionConflict`], which is distinct
//! from a write to a nonexistent path.

use async_trait::async_trait;
use thiserror::Error;

/// Opaque per-node version token
///
/// Only meaningful when passed back to the store that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Version(pub u64);

/// Errors from store operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KvError {
    /// The path (or all of its ancestors) does not exist
    #[error("path not found: {0}")]
    NotFound(String),
    /// The expected version is stale; re-read and retry
    #[error("version conflict at {0}")]
    VersionConflict(String),
    /// Transport or backend failure; not retryable by callers in this
    /// workspace
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Adapter seam for the underlying versioned store
#[async_trait]
pub trait KvStore: Clone + Send + Sync + 'static {
    /// Create the path and any missing ancestors; no-op when present
    async fn ensure_path(&self, path: &str) -> Result<(), KvError>;

    /// Read a node's payload and current version
    ///
    /// An existing node with no payload reads as `(None, version)`; an
    /// absent node is `KvError::NotFound`.
    async fn get(&self, path: &str) -> Result<(Option<Vec<u8>>, Version), KvError>;

    /// Compare-and-swap write; succeeds only if `expected` is current
    async fn set(&self, path: &str, data: &[u8], expected: Version) -> Result<Version, KvError>;

    /// Names of a node's direct children
    async fn list_children(&self, path: &str) -> Result<Vec<String>, KvError>;

    /// Whether a node exists
    async fn exists(&self, path: &str) -> Result<bool, KvError> {
        match self.get(path).await {
            Ok(_) => Ok(true),
            Err(KvError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
