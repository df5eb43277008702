// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::kv::{KvError, KvStore, Version};
use crate::memory::MemoryStore;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvCall {
    EnsurePath(String),
    Get(String),
    Set { path: String, expected: u64 },
    ListChildren(String),
}

/// Fake store: a [`MemoryStore`] with call recording and fault injection
///
/// Injected version conflicts let tests drive a writer through its retry
/// loop deterministically; a one-shot fault, optionally scheduled a number
/// of calls ahead, models transport failure at a chosen point in a sequence.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Vec<KvCall>>>,
    conflicts: Arc<Mutex<u32>>,
    fault: Arc<Mutex<Option<(u32, KvError)>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped memory store, for direct state setup and inspection
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<KvCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of recorded `set` calls
    pub fn set_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, KvCall::Set { .. }))
            .count()
    }

    /// Make the next `count` set calls fail with a version conflict without
    /// touching stored state
    pub fn inject_conflicts(&self, count: u32) {
        *self.conflicts.lock().unwrap_or_else(|e| e.into_inner()) = count;
    }

    /// Make the next store call fail with the given error
    pub fn inject_fault(&self, error: KvError) {
        self.inject_fault_after(0, error);
    }

    /// Make the first store call after skipping `skip` calls fail with the
    /// given error; the skip countdown starts when the fault is armed
    pub fn inject_fault_after(&self, skip: u32, error: KvError) {
        *self.fault.lock().unwrap_or_else(|e| e.into_inner()) = Some((skip, error));
    }

    fn record(&self, call: KvCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }

    fn take_fault(&self) -> Option<KvError> {
        let mut fault = self.fault.lock().unwrap_or_else(|e| e.into_inner());
        match fault.as_mut() {
            Some((0, _)) => fault.take().map(|(_, error)| error),
            Some((skip, _)) => {
                *skip -= 1;
                None
            }
            None => None,
        }
    }

    fn take_conflict(&self) -> bool {
        let mut conflicts = self.conflicts.lock().unwrap_or_else(|e| e.into_inner());
        if *conflicts > 0 {
            *conflicts -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl KvStore for FakeStore {
    async fn ensure_path(&self, path: &str) -> Result<(), KvError> {
        self.record(KvCall::EnsurePath(path.to_string()));
        if let Some(err) = self.take_fault() {
            return Err(err);
        }
        self.inner.ensure_path(path).await
    }

    async fn get(&self, path: &str) -> Result<(Option<Vec<u8>>, Version), KvError> {
        self.record(KvCall::Get(path.to_string()));
        if let Some(err) = self.take_fault() {
            return Err(err);
        }
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, data: &[u8], expected: Version) -> Result<Version, KvError> {
        self.record(KvCall::Set {
            path: path.to_string(),
            expected: expected.0,
        });
        if let Some(err) = self.take_fault() {
            return Err(err);
        }
        if self.take_conflict() {
            return Err(KvError::VersionConflict(path.to_string()));
        }
        self.inner.set(path, data, expected).await
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>, KvError> {
        self.record(KvCall::ListChildren(path.to_string()));
        if let Some(err) = self.take_fault() {
            return Err(err);
        }
        self.inner.list_children(path).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
