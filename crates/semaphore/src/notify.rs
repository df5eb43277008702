// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Release notification seam
//!
//! After a batch release the handler emits one event per released semaphore
//! so the embedding scheduler can re-evaluate pending work. The event is a
//! hint, not a guarantee: consumers are free to batch, delay, or coalesce,
//! and emission errors are logged and swallowed.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification emission
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

/// Consumer of semaphore-released events
#[async_trait]
pub trait ReleaseNotifier: Send + Sync {
    /// Signal that a slot of the named semaphore may have become free
    async fn notify_released(&self, tenant: &str, semaphore: &str) -> Result<(), NotifyError>;
}

/// Notifier that drops all events
#[derive(Clone, Debug, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl ReleaseNotifier for NoOpNotifier {
    async fn notify_released(&self, _tenant: &str, _semaphore: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Recording notifier for tests
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeNotifier {
    events: std::sync::Arc<std::sync::Mutex<Vec<(String, String)>>>,
    fail: std::sync::Arc<std::sync::Mutex<bool>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded (tenant, semaphore) events, in emission order
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every subsequent notification fail
    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = failing;
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl ReleaseNotifier for FakeNotifier {
    async fn notify_released(&self, tenant: &str, semaphore: &str) -> Result<(), NotifyError> {
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(NotifyError::Failed("injected".to_string()));
        }
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((tenant.to_string(), semaphore.to_string()));
        Ok(())
    }
}
