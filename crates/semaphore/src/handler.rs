// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The semaphore coordinator
//!
//! All shared state lives at semaphore paths in the store, guarded only by
//! per-path version checks. Every mutation goes through one optimistic
//! read-modify-write loop; version conflicts are re-read and retried without
//! bound, since conflict means healthy contention rather than failure.

use crate::error::SemaphoreError;
use crate::notify::ReleaseNotifier;
use crate::stats::StatsSink;
use ballast_core::{
    decode_holders, decode_segment, encode_holders, semaphore_path, stats_key, tenant_root,
    HolderEntry, HolderRecord, Job, JobSemaphore, SemaphoreDefinition, SemaphoreSource, WorkItem,
    GLOBAL_ROOT,
};
use ballast_store::{KvError, KvStore};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Outcome of one step of the optimistic read-modify-write loop
enum CasStep<T> {
    /// Write the mutated list, retrying the step on version conflict
    Commit(T),
    /// Finish without writing
    Done(T),
}

/// Distributed counting-semaphore coordinator
///
/// Stateless apart from injected collaborators; one instance may be shared
/// by any number of concurrent callers, and independent instances in other
/// processes interoperate through the store alone.
pub struct SemaphoreHandler<K, L, S, N> {
    store: K,
    layout: Arc<L>,
    stats: S,
    notifier: N,
    tenant: String,
}

impl<K, L, S, N> SemaphoreHandler<K, L, S, N>
where
    K: KvStore,
    L: SemaphoreSource,
    S: StatsSink,
    N: ReleaseNotifier,
{
    pub fn new(store: K, layout: Arc<L>, tenant: impl Into<String>, stats: S, notifier: N) -> Self {
        Self {
            store,
            layout,
            stats,
            notifier,
            tenant: tenant.into(),
        }
    }

    /// Tenant this handler coordinates for
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Acquire every semaphore the job declares
    ///
    /// Returns `Ok(false)` when any of them is at capacity; slots acquired
    /// earlier in the sequence are rolled back first, so the observable end
    /// state is all-or-nothing. During the resource-request phase
    /// (`requesting_resources`), requirements marked `after_resources` are
    /// skipped as immediate successes.
    pub async fn acquire(
        &self,
        item: &WorkItem,
        job: &Job,
        requesting_resources: bool,
    ) -> Result<bool, SemaphoreError> {
        for requirement in &job.semaphores {
            if self
                .acquire_one(item, job, requirement, requesting_resources)
                .await?
            {
                continue;
            }
            tracing::debug!(
                semaphore = %requirement.name,
                job = %job.name,
                "semaphore at capacity, rolling back"
            );
            self.release_all(item, job, true, false).await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Release every semaphore the job declares, then notify the scheduler
    /// seam once per semaphore
    ///
    /// Entries the job does not actually hold are reported via the log, not
    /// as errors, so a batch release always runs to completion unless the
    /// store itself fails.
    pub async fn release(&self, item: &WorkItem, job: &Job) -> Result<(), SemaphoreError> {
        self.release_all(item, job, false, true).await
    }

    /// Current holder list of a semaphore; an absent node is an empty list
    pub async fn semaphore_holders(&self, name: &str) -> Result<Vec<HolderEntry>, SemaphoreError> {
        let definition = self.definition(name)?;
        let path = semaphore_path(&definition, &self.tenant);
        self.holders_at(&path).await
    }

    /// Names of all semaphores with a node in the store, across the global
    /// root and this handler's tenant root
    pub async fn get_semaphores(&self) -> Result<Vec<String>, SemaphoreError> {
        let mut names = BTreeSet::new();
        for root in self.roots() {
            for child in self.children_or_empty(&root).await? {
                names.insert(decode_segment(&child));
            }
        }
        Ok(names.into_iter().collect())
    }

    /// Release holders whose buildset node no longer exists
    ///
    /// A structured holder whose `buildset_path` is gone was leaked by an
    /// owner that terminated without releasing. Legacy bare-string holders
    /// carry no recoverable ownership path and are skipped with a warning.
    /// Safe to run repeatedly and concurrently with normal traffic.
    pub async fn cleanup_leaks(&self) -> Result<(), SemaphoreError> {
        for root in self.roots() {
            for child in self.children_or_empty(&root).await? {
                let path = format!("{root}/{child}");
                for entry in self.holders_at(&path).await? {
                    match entry {
                        HolderEntry::Handle(handle) => {
                            tracing::warn!(
                                path,
                                handle,
                                "legacy holder has no buildset path, cannot check for leaks"
                            );
                        }
                        HolderEntry::Record(record) => {
                            if self.store.exists(&record.buildset_path).await? {
                                continue;
                            }
                            tracing::info!(
                                path,
                                buildset_path = %record.buildset_path,
                                job = %record.job_name,
                                "releasing leaked semaphore holder"
                            );
                            self.release_one(&path, &record, None, false).await?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn acquire_one(
        &self,
        item: &WorkItem,
        job: &Job,
        requirement: &JobSemaphore,
        requesting_resources: bool,
    ) -> Result<bool, SemaphoreError> {
        if requirement.after_resources && requesting_resources {
            // Acquired later, once resources are granted
            return Ok(true);
        }

        let definition = self.definition(&requirement.name)?;
        let path = semaphore_path(&definition, &self.tenant);
        let record = item.holder_record(&job.name);
        let handle = item.legacy_handle(&job.name);
        let max = definition.effective_max();

        self.store.ensure_path(&path).await?;
        let (acquired, written) = self
            .update_holders(&path, |holders| {
                if holders.iter().any(|e| e.matches(&record, Some(&handle))) {
                    // Acquisition is idempotent per requester
                    return CasStep::Done(true);
                }
                if holders.len() >= max {
                    return CasStep::Done(false);
                }
                holders.push(HolderEntry::Record(record.clone()));
                CasStep::Commit(true)
            })
            .await?;

        if let Some(count) = written {
            self.emit_gauge(&path, count);
            tracing::debug!(
                semaphore = %requirement.name,
                job = %job.name,
                holders = count,
                "acquired semaphore"
            );
        }
        Ok(acquired)
    }

    async fn release_all(
        &self,
        item: &WorkItem,
        job: &Job,
        quiet: bool,
        notify: bool,
    ) -> Result<(), SemaphoreError> {
        for requirement in &job.semaphores {
            let definition = self.definition(&requirement.name)?;
            let path = semaphore_path(&definition, &self.tenant);
            let record = item.holder_record(&job.name);
            let handle = item.legacy_handle(&job.name);
            self.release_one(&path, &record, Some(&handle), quiet)
                .await?;
        }
        if notify {
            for requirement in &job.semaphores {
                if let Err(e) = self
                    .notifier
                    .notify_released(&self.tenant, &requirement.name)
                    .await
                {
                    tracing::warn!(
                        semaphore = %requirement.name,
                        error = %e,
                        "release notification failed"
                    );
                }
            }
        }
        Ok(())
    }

    /// Remove one holder entry, preferring the structured match over the
    /// legacy handle match
    async fn release_one(
        &self,
        path: &str,
        record: &HolderRecord,
        handle: Option<&str>,
        quiet: bool,
    ) -> Result<(), SemaphoreError> {
        let result = self
            .update_holders(path, |holders| {
                let index = holders
                    .iter()
                    .position(|e| e.as_record() == Some(record))
                    .or_else(|| {
                        handle.and_then(|h| holders.iter().position(|e| e.is_handle(h)))
                    });
                match index {
                    Some(i) => {
                        holders.remove(i);
                        CasStep::Commit(true)
                    }
                    None => CasStep::Done(false),
                }
            })
            .await;

        match result {
            Ok((true, written)) => {
                if let Some(count) = written {
                    self.emit_gauge(path, count);
                }
                tracing::debug!(path, job = %record.job_name, "released semaphore");
                Ok(())
            }
            Ok((false, _)) => {
                if !quiet {
                    tracing::error!(
                        path,
                        job = %record.job_name,
                        "semaphore release requested but not held"
                    );
                }
                Ok(())
            }
            // A node that was never created is the same as "not held"
            Err(SemaphoreError::Store(KvError::NotFound(_))) => {
                if !quiet {
                    tracing::error!(
                        path,
                        job = %record.job_name,
                        "semaphore release requested but not held"
                    );
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Optimistic read-modify-write loop over one semaphore's holder list
    ///
    /// Returns the step's value, plus the holder count after the write when
    /// a write happened.
    async fn update_holders<T, F>(
        &self,
        path: &str,
        mut step: F,
    ) -> Result<(T, Option<usize>), SemaphoreError>
    where
        F: FnMut(&mut Vec<HolderEntry>) -> CasStep<T>,
    {
        let (data, mut version) = self.store.get(path).await?;
        let mut holders = self.decode_at(path, data.as_deref())?;
        loop {
            match step(&mut holders) {
                CasStep::Done(value) => return Ok((value, None)),
                CasStep::Commit(value) => {
                    let encoded = encode_holders(&holders).map_err(|source| {
                        SemaphoreError::Codec {
                            path: path.to_string(),
                            source,
                        }
                    })?;
                    match self.store.set(path, &encoded, version).await {
                        Ok(_) => return Ok((value, Some(holders.len()))),
                        Err(KvError::VersionConflict(_)) => {
                            tracing::debug!(path, "version conflict, retrying");
                            let (data, next) = self.store.get(path).await?;
                            version = next;
                            holders = self.decode_at(path, data.as_deref())?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }

    async fn holders_at(&self, path: &str) -> Result<Vec<HolderEntry>, SemaphoreError> {
        match self.store.get(path).await {
            Ok((data, _)) => self.decode_at(path, data.as_deref()),
            Err(KvError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn children_or_empty(&self, path: &str) -> Result<Vec<String>, SemaphoreError> {
        match self.store.list_children(path).await {
            Ok(children) => Ok(children),
            Err(KvError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn decode_at(
        &self,
        path: &str,
        data: Option<&[u8]>,
    ) -> Result<Vec<HolderEntry>, SemaphoreError> {
        decode_holders(data).map_err(|source| SemaphoreError::Codec {
            path: path.to_string(),
            source,
        })
    }

    fn definition(&self, name: &str) -> Result<SemaphoreDefinition, SemaphoreError> {
        self.layout
            .get_semaphore(name)
            .ok_or_else(|| SemaphoreError::UnknownSemaphore(name.to_string()))
    }

    fn roots(&self) -> [String; 2] {
        [GLOBAL_ROOT.to_string(), tenant_root(&self.tenant)]
    }

    fn emit_gauge(&self, path: &str, count: usize) {
        let key = stats_key(path);
        if let Err(e) = self.stats.gauge(&key, count as u64) {
            tracing::warn!(key, error = %e, "gauge emission failed");
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
