// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed cache store, so cached fetches survive across runs.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

use super::store::{CacheStore, EntrySummary};
use super::CacheEntry;
use crate::error::{CacheCorruption, Error, Result};
use crate::issue::Issue;
use crate::query::QueryKey;

/// SQL schema for the cache database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cache_entries (
    fingerprint TEXT PRIMARY KEY,
    query_key TEXT NOT NULL,      -- JSON-encoded QueryKey
    issue_count INTEGER NOT NULL,
    issues TEXT NOT NULL,         -- JSON array of issues, in fetch order
    fetched_at_ms INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cache_fetched_at ON cache_entries(fetched_at_ms);
"#;

/// Cache store persisted in a SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the cache database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<usize> {
        Ok(self.conn().execute(sql, [])?)
    }
}

fn malformed(fingerprint: &str, reason: impl std::fmt::Display) -> Error {
    Error::CacheCorruption(CacheCorruption::Malformed {
        fingerprint: fingerprint.to_string(),
        reason: reason.to_string(),
    })
}

fn to_sql_ms(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

impl CacheStore for SqliteStore {
    fn load(&self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        let row: Option<(String, String, i64)> = self
            .conn()
            .query_row(
                "SELECT query_key, issues, fetched_at_ms FROM cache_entries WHERE fingerprint = ?1",
                params![fingerprint],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((key_json, issues_json, fetched_at_ms)) = row else {
            return Ok(None);
        };

        let key: QueryKey = serde_json::from_str(&key_json)
            .map_err(|e| malformed(fingerprint, format!("query key: {e}")))?;
        let issues: Vec<Issue> = serde_json::from_str(&issues_json)
            .map_err(|e| malformed(fingerprint, format!("issues: {e}")))?;
        let fetched_at_ms = u64::try_from(fetched_at_ms)
            .map_err(|_| malformed(fingerprint, format!("negative timestamp {fetched_at_ms}")))?;

        Ok(Some(CacheEntry { key, issues, fetched_at_ms }))
    }

    fn save(&self, entry: &CacheEntry) -> Result<()> {
        let key_json = serde_json::to_string(&entry.key)?;
        let issues_json = serde_json::to_string(&entry.issues)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO cache_entries
                (fingerprint, query_key, issue_count, issues, fetched_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.key.fingerprint(),
                key_json,
                i64::try_from(entry.issues.len()).unwrap_or(i64::MAX),
                issues_json,
                to_sql_ms(entry.fetched_at_ms),
            ],
        )?;
        Ok(())
    }

    fn evict_older_than(&self, cutoff_ms: u64) -> Result<usize> {
        let removed = self.conn().execute(
            "DELETE FROM cache_entries WHERE fetched_at_ms < ?1",
            params![to_sql_ms(cutoff_ms)],
        )?;
        Ok(removed)
    }

    fn entries(&self) -> Result<Vec<EntrySummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT fingerprint, query_key, issue_count, fetched_at_ms
             FROM cache_entries ORDER BY fetched_at_ms, fingerprint",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (fingerprint, key_json, issue_count, fetched_at_ms) in rows {
            let Ok(key) = serde_json::from_str::<QueryKey>(&key_json) else {
                warn!(fingerprint = %fingerprint, "skipping cache entry with malformed query key");
                continue;
            };
            summaries.push(EntrySummary {
                key,
                fingerprint,
                issue_count: usize::try_from(issue_count).unwrap_or(0),
                fetched_at_ms: u64::try_from(fetched_at_ms).unwrap_or(0),
            });
        }
        Ok(summaries)
    }

    fn clear(&self) -> Result<usize> {
        Ok(self.conn().execute("DELETE FROM cache_entries", [])?)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
