// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store path and metrics key derivation
//!
//! Pure functions; the mapping from (scope, name) to a store path needs no
//! storage of its own and two distinct (scope, name) pairs never collide.

use crate::definition::SemaphoreDefinition;

/// Root node for semaphores shared across all tenants
pub const GLOBAL_ROOT: &str = "/ballast/global-semaphores";

/// Root node for one tenant's semaphores
pub fn tenant_root(tenant: &str) -> String {
    format!("/ballast/semaphores/{}", urlencoding::encode(tenant))
}

/// Store path of a semaphore's holder-list node
pub fn semaphore_path(definition: &SemaphoreDefinition, tenant: &str) -> String {
    let name = urlencoding::encode(&definition.name);
    if definition.global_scope {
        format!("{GLOBAL_ROOT}/{name}")
    } else {
        format!("{}/{name}", tenant_root(tenant))
    }
}

/// Display name of a percent-encoded path segment
///
/// A segment that does not decode cleanly is returned as-is rather than
/// dropped, so store listings always account for every child.
pub fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Metrics key for a semaphore path's holder-count gauge
///
/// Takes the last path segment and replaces anything unsafe for metrics
/// backends with `_`.
pub fn stats_key(path: &str) -> String {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let safe: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("semaphore.holders.{safe}")
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
