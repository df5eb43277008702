// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process reference store backend
//!
//! Linearizable per path under a single mutex. Useful as the backend for a
//! single-process deployment and as the substrate for tests; distributed
//! deployments plug a remote store into the same [`KvStore`] seam.

use crate::kv::{KvError, KvStore, Version};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
struct Node {
    data: Option<Vec<u8>>,
    version: u64,
}

/// In-memory hierarchical versioned store
#[derive(Clone, Default)]
pub struct MemoryStore {
    nodes: Arc<Mutex<BTreeMap<String, Node>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with a payload, bypassing version checks
    ///
    /// Seeds legacy or externally-written state that the coordinator should
    /// observe; not part of the [`KvStore`] contract.
    pub fn seed(&self, path: &str, data: &[u8]) {
        let mut nodes = self.lock();
        ensure_ancestors(&mut nodes, path);
        let node = nodes.entry(path.to_string()).or_default();
        node.data = Some(data.to_vec());
        node.version += 1;
    }

    /// Remove a node and everything below it, bypassing version checks
    pub fn remove_tree(&self, path: &str) {
        let mut nodes = self.lock();
        let prefix = format!("{path}/");
        nodes.retain(|key, _| key != path && !key.starts_with(&prefix));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Node>> {
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn valid(path: &str) -> Result<(), KvError> {
    if path.len() > 1 && path.starts_with('/') && !path.ends_with('/') {
        Ok(())
    } else {
        Err(KvError::Backend(format!("invalid path: {path:?}")))
    }
}

fn ensure_ancestors(nodes: &mut BTreeMap<String, Node>, path: &str) {
    let mut prefix = String::new();
    for segment in path.split('/').skip(1) {
        prefix.push('/');
        prefix.push_str(segment);
        nodes.entry(prefix.clone()).or_default();
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn ensure_path(&self, path: &str) -> Result<(), KvError> {
        valid(path)?;
        ensure_ancestors(&mut self.lock(), path);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<(Option<Vec<u8>>, Version), KvError> {
        valid(path)?;
        let nodes = self.lock();
        let node = nodes
            .get(path)
            .ok_or_else(|| KvError::NotFound(path.to_string()))?;
        Ok((node.data.clone(), Version(node.version)))
    }

    async fn set(&self, path: &str, data: &[u8], expected: Version) -> Result<Version, KvError> {
        valid(path)?;
        let mut nodes = self.lock();
        let node = nodes
            .get_mut(path)
            .ok_or_else(|| KvError::NotFound(path.to_string()))?;
        if node.version != expected.0 {
            return Err(KvError::VersionConflict(path.to_string()));
        }
        node.data = Some(data.to_vec());
        node.version += 1;
        Ok(Version(node.version))
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>, KvError> {
        valid(path)?;
        let nodes = self.lock();
        if !nodes.contains_key(path) {
            return Err(KvError::NotFound(path.to_string()));
        }
        let prefix = format!("{path}/");
        let children: BTreeSet<String> = nodes
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(|rest| match rest.split_once('/') {
                Some((first, _)) => first.to_string(),
                None => rest.to_string(),
            })
            .collect();
        Ok(children.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
