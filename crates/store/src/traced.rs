// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::kv::{KvError, KvStore, Version};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any KvStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: KvStore> KvStore for TracedStore<S> {
    async fn ensure_path(&self, path: &str) -> Result<(), KvError> {
        let span = tracing::debug_span!("store.ensure_path", path);
        async {
            let result = self.inner.ensure_path(path).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "ensure_path failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get(&self, path: &str) -> Result<(Option<Vec<u8>>, Version), KvError> {
        let span = tracing::debug_span!("store.get", path);
        async {
            let result = self.inner.get(path).await;
            match &result {
                Ok((data, version)) => tracing::debug!(
                    bytes = data.as_ref().map_or(0, Vec::len),
                    version = version.0,
                    "read"
                ),
                Err(KvError::NotFound(_)) => tracing::debug!("not found"),
                Err(e) => tracing::error!(error = %e, "get failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn set(&self, path: &str, data: &[u8], expected: Version) -> Result<Version, KvError> {
        let span = tracing::debug_span!("store.set", path, expected = expected.0);
        async {
            let result = self.inner.set(path, data, expected).await;
            match &result {
                Ok(version) => tracing::debug!(bytes = data.len(), version = version.0, "wrote"),
                // Conflicts are healthy contention, not failures
                Err(KvError::VersionConflict(_)) => tracing::debug!("version conflict"),
                Err(e) => tracing::error!(error = %e, "set failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>, KvError> {
        let span = tracing::debug_span!("store.list_children", path);
        async {
            let result = self.inner.list_children(path).await;
            match &result {
                Ok(children) => tracing::debug!(count = children.len(), "listed"),
                Err(KvError::NotFound(_)) => tracing::debug!("not found"),
                Err(e) => tracing::error!(error = %e, "list_children failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
