// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work items and the semaphore requirements a job declares

use crate::holder::HolderRecord;
use serde::{Deserialize, Serialize};

/// A unit of work that can occupy semaphore slots
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier of the item
    pub uuid: String,
    /// Store path of the item's buildset node; existence of this path is
    /// what distinguishes a live holder from a leaked one
    pub buildset_path: String,
}

impl WorkItem {
    pub fn new(uuid: impl Into<String>, buildset_path: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            buildset_path: buildset_path.into(),
        }
    }

    /// Structured holder record this item writes for the given job
    pub fn holder_record(&self, job_name: &str) -> HolderRecord {
        HolderRecord::new(&self.buildset_path, job_name)
    }

    /// Bare-string handle written by pre-structured coordinators; matched on
    /// release so mixed-version coordinators interoperate
    pub fn legacy_handle(&self, job_name: &str) -> String {
        format!("{}-{}", self.uuid, job_name)
    }
}

/// One semaphore requirement declared by a job
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSemaphore {
    /// Name of the required semaphore
    pub name: String,
    /// Acquire only once resources are granted; during the resource-request
    /// phase this requirement is skipped as an immediate success
    #[serde(default)]
    pub after_resources: bool,
}

impl JobSemaphore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            after_resources: false,
        }
    }

    pub fn with_after_resources(mut self, after: bool) -> Self {
        self.after_resources = after;
        self
    }
}

/// A job and the semaphores it must hold to run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub semaphores: Vec<JobSemaphore>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semaphores: Vec::new(),
        }
    }

    pub fn requiring(mut self, semaphore: JobSemaphore) -> Self {
        self.semaphores.push(semaphore);
        self
    }
}

#[cfg(test)]
#[path = "work_tests.rs"]
mod tests;
