// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Freshness-window cache for fetched issues.
//!
//! [`IssueCache`] sits in front of the fetcher. A lookup inside the
//! freshness window is served from the [`CacheStore`]; anything else goes to
//! the fetch function and the result replaces the stored entry.
//!
//! Each query key has a single-flight slot: the whole
//! load → check → fetch → store sequence runs while holding the key's async
//! mutex, so concurrent callers for the same key wait for the first fetch
//! and then find its entry in the store instead of fetching again.
//!
//! Entries older than the retention age are evicted lazily, on access.

mod sqlite;
mod store;

pub use sqlite::SqliteStore;
pub use store::{CacheStore, EntrySummary, MemoryStore};

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::clock::{ClockSource, SystemClock};
use crate::error::{CacheCorruption, Error, FetchError, Result};
use crate::issue::Issue;
use crate::query::QueryKey;

/// A stored fetch result.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: QueryKey,
    pub issues: Vec<Issue>,
    /// Clock reading when the fetch completed, in ms since Unix epoch.
    pub fetched_at_ms: u64,
}

impl CacheEntry {
    /// Checks the entry against the key it was loaded for and returns its age.
    pub fn age_ms(
        &self,
        expected: &QueryKey,
        now_ms: u64,
    ) -> std::result::Result<u64, CacheCorruption> {
        if self.key != *expected {
            return Err(CacheCorruption::KeyMismatch { fingerprint: expected.fingerprint() });
        }
        if self.fetched_at_ms > now_ms {
            return Err(CacheCorruption::NegativeAge { fetched_at_ms: self.fetched_at_ms, now_ms });
        }
        Ok(now_ms - self.fetched_at_ms)
    }
}

/// Converts a duration to whole milliseconds, saturating.
pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Memoizes fetch results by [`QueryKey`].
pub struct IssueCache<S: CacheStore, C: ClockSource = SystemClock> {
    store: S,
    clock: C,
    retention: Duration,
    in_flight: Mutex<HashMap<QueryKey, Arc<AsyncMutex<()>>>>,
}

impl<S: CacheStore> IssueCache<S, SystemClock> {
    /// Creates a cache over `store` using the system clock.
    pub fn new(store: S, retention: Duration) -> Self {
        Self::with_clock(store, SystemClock, retention)
    }
}

impl<S: CacheStore, C: ClockSource> IssueCache<S, C> {
    /// Creates a cache with a custom clock source.
    pub fn with_clock(store: S, clock: C, retention: Duration) -> Self {
        IssueCache { store, clock, retention, in_flight: Mutex::new(HashMap::new()) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Returns the issues for `query`, fetching only if no entry is younger
    /// than `freshness`.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        query: &QueryKey,
        freshness: Duration,
        fetch: F,
    ) -> Result<Vec<Issue>>
    where
        F: FnOnce(QueryKey) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<Issue>, FetchError>>,
    {
        self.resolve(query, Some(freshness), fetch).await
    }

    /// Fetches `query` unconditionally and overwrites any stored entry.
    pub async fn refresh<F, Fut>(&self, query: &QueryKey, fetch: F) -> Result<Vec<Issue>>
    where
        F: FnOnce(QueryKey) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<Issue>, FetchError>>,
    {
        self.resolve(query, None, fetch).await
    }

    async fn resolve<F, Fut>(
        &self,
        query: &QueryKey,
        freshness: Option<Duration>,
        fetch: F,
    ) -> Result<Vec<Issue>>
    where
        F: FnOnce(QueryKey) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<Issue>, FetchError>>,
    {
        let slot = self.acquire_slot(query);
        let result = {
            let _guard = slot.lock().await;
            self.resolve_locked(query, freshness, fetch).await
        };
        self.release_slot(query, slot);
        result
    }

    async fn resolve_locked<F, Fut>(
        &self,
        query: &QueryKey,
        freshness: Option<Duration>,
        fetch: F,
    ) -> Result<Vec<Issue>>
    where
        F: FnOnce(QueryKey) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<Issue>, FetchError>>,
    {
        let now_ms = self.clock.now_ms();
        let cutoff_ms = now_ms.saturating_sub(duration_ms(self.retention));
        let evicted = self.store.evict_older_than(cutoff_ms)?;
        if evicted > 0 {
            debug!(evicted, "evicted cache entries past retention");
        }

        if let Some(freshness) = freshness {
            match self.live_entry(query, now_ms, duration_ms(freshness)) {
                Ok(Some(entry)) => return Ok(entry.issues),
                Ok(None) => {}
                Err(Error::CacheCorruption(corruption)) => {
                    warn!(query = %query, "discarding corrupted cache entry: {}", corruption);
                }
                Err(e) => return Err(e),
            }
        } else {
            debug!(query = %query, "forced refresh, bypassing cache");
        }

        let issues = fetch(query.clone()).await?;
        let entry = CacheEntry { key: query.clone(), issues, fetched_at_ms: self.clock.now_ms() };
        self.store.save(&entry)?;
        debug!(query = %query, issues = entry.issues.len(), "stored fetch result");
        Ok(entry.issues)
    }

    /// Loads the entry for `query` if it is younger than `freshness_ms`.
    fn live_entry(
        &self,
        query: &QueryKey,
        now_ms: u64,
        freshness_ms: u64,
    ) -> Result<Option<CacheEntry>> {
        let Some(entry) = self.store.load(&query.fingerprint())? else {
            debug!(query = %query, "cache miss");
            return Ok(None);
        };
        let age_ms = entry.age_ms(query, now_ms)?;
        if age_ms <= freshness_ms {
            debug!(query = %query, age_ms, "cache hit");
            Ok(Some(entry))
        } else {
            debug!(query = %query, age_ms, "cache entry stale");
            Ok(None)
        }
    }

    fn acquire_slot(&self, query: &QueryKey) -> Arc<AsyncMutex<()>> {
        let mut slots = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(query.clone()).or_default().clone()
    }

    fn release_slot(&self, query: &QueryKey, slot: Arc<AsyncMutex<()>>) {
        let mut slots = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map plus ours: nobody else is waiting.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(query);
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
