// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Storage backends for [`IssueCache`](super::IssueCache).

use std::collections::HashMap;
use std::sync::Mutex;

use super::CacheEntry;
use crate::error::Result;
use crate::query::QueryKey;

/// Metadata about one stored entry, without its issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub key: QueryKey,
    pub fingerprint: String,
    pub issue_count: usize,
    pub fetched_at_ms: u64,
}

/// Persistence for cache entries, indexed by [`QueryKey::fingerprint`].
///
/// Implementations return [`Error::CacheCorruption`](crate::Error::CacheCorruption)
/// from [`load`](Self::load) when a stored entry cannot be decoded.
pub trait CacheStore: Send + Sync {
    fn load(&self, fingerprint: &str) -> Result<Option<CacheEntry>>;

    /// Inserts or replaces the entry for `entry.key`.
    fn save(&self, entry: &CacheEntry) -> Result<()>;

    /// Removes entries fetched before `cutoff_ms`, returning how many went.
    fn evict_older_than(&self, cutoff_ms: u64) -> Result<usize>;

    /// Lists stored entries, oldest first.
    fn entries(&self) -> Result<Vec<EntrySummary>>;

    /// Removes every entry, returning how many went.
    fn clear(&self) -> Result<usize>;
}

/// In-process store; contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entry` under an arbitrary fingerprint.
    #[cfg(test)]
    pub(crate) fn insert_at(&self, fingerprint: &str, entry: CacheEntry) {
        self.lock().insert(fingerprint.to_string(), entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        Ok(self.lock().get(fingerprint).cloned())
    }

    fn save(&self, entry: &CacheEntry) -> Result<()> {
        self.lock().insert(entry.key.fingerprint(), entry.clone());
        Ok(())
    }

    fn evict_older_than(&self, cutoff_ms: u64) -> Result<usize> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.fetched_at_ms >= cutoff_ms);
        Ok(before - entries.len())
    }

    fn entries(&self) -> Result<Vec<EntrySummary>> {
        let mut summaries: Vec<EntrySummary> = self
            .lock()
            .iter()
            .map(|(fingerprint, entry)| EntrySummary {
                key: entry.key.clone(),
                fingerprint: fingerprint.clone(),
                issue_count: entry.issues.len(),
                fetched_at_ms: entry.fetched_at_ms,
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.fetched_at_ms.cmp(&b.fetched_at_ms).then_with(|| a.fingerprint.cmp(&b.fingerprint))
        });
        Ok(summaries)
    }

    fn clear(&self) -> Result<usize> {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        Ok(count)
    }
}
