// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Holder records and the holder-list wire codec
//!
//! The payload stored at a semaphore path is a JSON list whose elements are
//! either a structured record or a bare string handle written by coordinators
//! from before the structured format. Mixed lists occur during rolling
//! upgrades and must round-trip untouched.

use serde::{Deserialize, Serialize};

/// Structured marker for one occupied semaphore slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    /// Store path of the buildset that owns the slot; used to detect
    /// orphaned holders whose owner no longer exists
    pub buildset_path: String,
    /// Label of the job holding the slot
    pub job_name: String,
}

impl HolderRecord {
    pub fn new(buildset_path: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            buildset_path: buildset_path.into(),
            job_name: job_name.into(),
        }
    }
}

/// One entry in a semaphore's holder list
///
/// `Handle` is the legacy bare-string form; new acquisitions always write
/// `Record`. The untagged representation maps a JSON string to `Handle` and
/// a JSON object to `Record`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HolderEntry {
    Handle(String),
    Record(HolderRecord),
}

impl HolderEntry {
    /// The structured record, if this entry has one
    pub fn as_record(&self) -> Option<&HolderRecord> {
        match self {
            HolderEntry::Record(record) => Some(record),
            HolderEntry::Handle(_) => None,
        }
    }

    /// Whether this entry is the given legacy handle
    pub fn is_handle(&self, handle: &str) -> bool {
        matches!(self, HolderEntry::Handle(h) if h == handle)
    }

    /// Whether this entry identifies the given requester, by structured
    /// record equality or, when a handle is supplied, legacy handle equality
    pub fn matches(&self, record: &HolderRecord, handle: Option<&str>) -> bool {
        match self {
            HolderEntry::Record(r) => r == record,
            HolderEntry::Handle(h) => handle.is_some_and(|expected| h == expected),
        }
    }
}

/// Decode a stored holder list; absent or empty payloads are an empty list
pub fn decode_holders(data: Option<&[u8]>) -> Result<Vec<HolderEntry>, serde_json::Error> {
    match data {
        None | Some([]) => Ok(Vec::new()),
        Some(bytes) => serde_json::from_slice(bytes),
    }
}

/// Encode a holder list for storage
///
/// Output is deterministic for logically equal input: entry order is
/// preserved and record fields serialize in declaration order.
pub fn encode_holders(holders: &[HolderEntry]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(holders)
}

#[cfg(test)]
#[path = "holder_tests.rs"]
mod tests;
