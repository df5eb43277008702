// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics gauge seam
//!
//! Gauge emission is strictly fire-and-forget: the handler logs sink errors
//! and carries on. A metrics backend outage can never fail a semaphore
//! operation.

use thiserror::Error;

/// Errors from gauge emission
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats backend error: {0}")]
    Backend(String),
}

/// Sink for holder-count gauges
pub trait StatsSink: Send + Sync {
    /// Record the current value of a gauge
    fn gauge(&self, key: &str, value: u64) -> Result<(), StatsError>;
}

/// Sink that discards all gauges
#[derive(Clone, Debug, Default)]
pub struct NoOpStatsSink;

impl StatsSink for NoOpStatsSink {
    fn gauge(&self, _key: &str, _value: u64) -> Result<(), StatsError> {
        Ok(())
    }
}

/// Recording sink for tests
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeStatsSink {
    gauges: std::sync::Arc<std::sync::Mutex<Vec<(String, u64)>>>,
    fail: std::sync::Arc<std::sync::Mutex<bool>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeStatsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded (key, value) pairs, in emission order
    pub fn gauges(&self) -> Vec<(String, u64)> {
        self.gauges.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Last recorded value for a key
    pub fn last(&self, key: &str) -> Option<u64> {
        self.gauges()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Make every subsequent gauge call fail
    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = failing;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl StatsSink for FakeStatsSink {
    fn gauge(&self, key: &str, value: u64) -> Result<(), StatsError> {
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StatsError::Backend("injected".to_string()));
        }
        self.gauges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((key.to_string(), value));
        Ok(())
    }
}
