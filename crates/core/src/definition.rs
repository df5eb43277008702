// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore definitions and the lookup seam that resolves them
//!
//! Definitions are owned by the embedding configuration system; the
//! coordinator only resolves name -> definition, on every operation, so a
//! config reload is visible immediately.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration of one named semaphore
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreDefinition {
    /// Name identifying this semaphore within its scope
    pub name: String,
    /// Number of simultaneous holders allowed
    pub max_count: u32,
    /// Shared across all tenants when true, tenant-local otherwise
    pub global_scope: bool,
}

impl SemaphoreDefinition {
    pub fn new(name: impl Into<String>, max_count: u32) -> Self {
        Self {
            name: name.into(),
            max_count,
            global_scope: false,
        }
    }

    pub fn with_global_scope(mut self, global: bool) -> Self {
        self.global_scope = global;
        self
    }

    /// Effective holder limit; a definition with `max_count == 0` still
    /// admits one holder
    pub fn effective_max(&self) -> usize {
        self.max_count.max(1) as usize
    }
}

/// Lookup seam for semaphore definitions
///
/// Implementations must reflect current configuration on every call; the
/// coordinator never caches the result across operations.
pub trait SemaphoreSource: Send + Sync {
    /// Resolve a semaphore definition by name
    fn get_semaphore(&self, name: &str) -> Option<SemaphoreDefinition>;
}

/// Map-backed semaphore source for embedded configs and tests
#[derive(Clone, Debug, Default)]
pub struct StaticSemaphores {
    definitions: HashMap<String, SemaphoreDefinition>,
}

impl StaticSemaphores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, definition: SemaphoreDefinition) -> Self {
        self.insert(definition);
        self
    }

    pub fn insert(&mut self, definition: SemaphoreDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn remove(&mut self, name: &str) -> Option<SemaphoreDefinition> {
        self.definitions.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SemaphoreSource for StaticSemaphores {
    fn get_semaphore(&self, name: &str) -> Option<SemaphoreDefinition> {
        self.definitions.get(name).cloned()
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
