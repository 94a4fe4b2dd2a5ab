// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Mock clock for testing with controllable time.
struct MockClock {
    time_ms: AtomicU64,
}

impl MockClock {
    fn new(initial_ms: u64) -> Self {
        MockClock { time_ms: AtomicU64::new(initial_ms) }
    }

    fn advance(&self, ms: u64) {
        self.time_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.time_ms.load(Ordering::SeqCst)
    }
}

const FRESHNESS: Duration = Duration::from_secs(60);
const RETENTION: Duration = Duration::from_secs(3600);
const START_MS: u64 = 1_700_000_000_000;

fn key(filter: &str) -> QueryKey {
    QueryKey::new("https://jira.example.com", filter, 50)
}

fn issues(ids: &[&str]) -> Vec<Issue> {
    ids.iter().map(|id| Issue::new(*id).with_priority("Major").with_status("Open")).collect()
}

/// Counts invocations and returns a fixed result.
#[derive(Default)]
struct CountingFetch {
    calls: AtomicUsize,
}

impl CountingFetch {
    async fn fetch(&self, _query: QueryKey) -> std::result::Result<Vec<Issue>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(issues(&["BUG-1", "BUG-2"]))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn cache(clock: &MockClock) -> IssueCache<MemoryStore, &MockClock> {
    IssueCache::with_clock(MemoryStore::new(), clock, RETENTION)
}

#[tokio::test]
async fn repeated_lookups_inside_window_fetch_once() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let fetcher = CountingFetch::default();

    for _ in 0..5 {
        let got = cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
        assert_eq!(got, issues(&["BUG-1", "BUG-2"]));
        clock.advance(10_000);
    }

    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn entry_exactly_at_freshness_is_live() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let fetcher = CountingFetch::default();

    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    clock.advance(60_000);
    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn stale_entry_is_refetched_and_restamped() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let fetcher = CountingFetch::default();

    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    clock.advance(60_001);
    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 2);
    let stored = cache.store().load(&key("a").fingerprint()).unwrap().unwrap();
    assert_eq!(stored.fetched_at_ms, START_MS + 60_001);
}

#[tokio::test]
async fn forced_refresh_always_fetches() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let fetcher = CountingFetch::default();

    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    cache.refresh(&key("a"), |q| fetcher.fetch(q)).await.unwrap();
    cache.refresh(&key("a"), |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn forced_refresh_overwrites_entry() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);

    cache.get_or_fetch(&key("a"), FRESHNESS, |_| async { Ok(issues(&["OLD-1"])) }).await.unwrap();
    clock.advance(1_000);
    let refreshed = cache.refresh(&key("a"), |_| async { Ok(issues(&["NEW-1"])) }).await.unwrap();
    assert_eq!(refreshed, issues(&["NEW-1"]));

    let fetcher = CountingFetch::default();
    let cached = cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    assert_eq!(cached, issues(&["NEW-1"]));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn different_keys_are_cached_independently() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let fetcher = CountingFetch::default();

    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    cache.get_or_fetch(&key("b"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_lookups_share_one_fetch() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let calls = AtomicUsize::new(0);
    let query = key("a");

    let lookups = (0..8).map(|_| {
        cache.get_or_fetch(&query, FRESHNESS, |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(issues(&["BUG-1", "BUG-2", "BUG-3"]))
        })
    });
    let results = futures_util::future::join_all(lookups).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for result in results {
        assert_eq!(result.unwrap(), issues(&["BUG-1", "BUG-2", "BUG-3"]));
    }
    assert!(cache.in_flight.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_lookups_across_threads_share_one_fetch() {
    let cache = Arc::new(IssueCache::with_clock(
        MemoryStore::new(),
        MockClock::new(START_MS),
        RETENTION,
    ));
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(&key("a"), FRESHNESS, |_| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(issues(&["BUG-9"]))
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), issues(&["BUG-9"]));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_fetch_stores_nothing() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);

    let err = cache
        .get_or_fetch(&key("a"), FRESHNESS, |_| async {
            Err(FetchError::Unreachable("connection refused".into()))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Unreachable(_))));
    assert!(cache.store().load(&key("a").fingerprint()).unwrap().is_none());

    let fetcher = CountingFetch::default();
    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn entry_from_the_future_is_treated_as_miss() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    cache
        .store()
        .save(&CacheEntry {
            key: key("a"),
            issues: issues(&["STALE-1"]),
            fetched_at_ms: START_MS + 5_000,
        })
        .unwrap();

    let fetcher = CountingFetch::default();
    let got = cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(got, issues(&["BUG-1", "BUG-2"]));
    let stored = cache.store().load(&key("a").fingerprint()).unwrap().unwrap();
    assert_eq!(stored.fetched_at_ms, START_MS);
}

#[tokio::test]
async fn entry_under_wrong_key_is_treated_as_miss() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    cache.store().insert_at(
        &key("a").fingerprint(),
        CacheEntry { key: key("b"), issues: issues(&["B-1"]), fetched_at_ms: START_MS },
    );

    let fetcher = CountingFetch::default();
    let got = cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(got, issues(&["BUG-1", "BUG-2"]));
}

#[tokio::test]
async fn malformed_sqlite_entry_is_refetched() {
    let clock = MockClock::new(START_MS);
    let cache = IssueCache::with_clock(SqliteStore::open_in_memory().unwrap(), &clock, RETENTION);
    let fetcher = CountingFetch::default();

    cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    cache.store().execute_raw("UPDATE cache_entries SET issues = '[{\"oops\":1}]'").unwrap();
    let got = cache.get_or_fetch(&key("a"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(got, issues(&["BUG-1", "BUG-2"]));
    assert!(cache.store().load(&key("a").fingerprint()).unwrap().is_some());
}

#[tokio::test]
async fn entries_past_retention_are_evicted_on_access() {
    let clock = MockClock::new(START_MS);
    let cache = cache(&clock);
    let fetcher = CountingFetch::default();

    cache.get_or_fetch(&key("old"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();
    clock.advance(3_600_001);
    cache.get_or_fetch(&key("new"), FRESHNESS, |q| fetcher.fetch(q)).await.unwrap();

    let remaining: Vec<String> = cache
        .store()
        .entries()
        .unwrap()
        .into_iter()
        .map(|s| s.key.filter().to_string())
        .collect();
    assert_eq!(remaining, vec!["new"]);
}

#[test]
fn age_ms_checks_key_and_clock() {
    let entry = CacheEntry { key: key("a"), issues: vec![], fetched_at_ms: 1_000 };
    assert_eq!(entry.age_ms(&key("a"), 1_500).unwrap(), 500);
    assert!(matches!(
        entry.age_ms(&key("a"), 999),
        Err(CacheCorruption::NegativeAge { fetched_at_ms: 1_000, now_ms: 999 })
    ));
    assert!(matches!(entry.age_ms(&key("b"), 1_500), Err(CacheCorruption::KeyMismatch { .. })));
}
