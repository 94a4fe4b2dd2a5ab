// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for bugstat-core operations.
//!
//! The taxonomy mirrors the pipeline stages: [`FetchError`] for the remote
//! source, [`CacheCorruption`] for stored entries that fail a consistency
//! check, and [`RenderError`] for artifact output. Unrecognized priority or
//! status labels are not errors at all; they land in the `Unknown` bucket.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::issue::Issue;

/// The remote call a [`FetchError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteRequest {
    /// Zero-based page of a query's results.
    Page(usize),
    /// Lookup of the query behind a saved filter.
    Filter,
}

impl fmt::Display for RemoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteRequest::Page(index) => write!(f, "page {index}"),
            RemoteRequest::Filter => f.write_str("filter lookup"),
        }
    }
}

/// Failure to obtain issues from the remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote source unreachable: {0}")]
    Unreachable(String),

    #[error("authentication rejected: {0}\n  hint: check the username and password in your config")]
    Unauthorized(String),

    #[error("remote source returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("malformed response from remote source: {0}")]
    Decode(String),

    #[error("{request} timed out after {}ms", after.as_millis())]
    Timeout { request: RemoteRequest, after: Duration },

    #[error("{request} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        request: RemoteRequest,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },

    #[error("fetch stopped after {} issues: {source}", partial.len())]
    Incomplete {
        /// Issues from the pages that completed before the failing page, in order.
        partial: Vec<Issue>,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true if a retry of the same page could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Unreachable(_) | FetchError::Timeout { .. } => true,
            FetchError::Status { code, .. } => *code == 429 || *code >= 500,
            FetchError::Unauthorized(_)
            | FetchError::Decode(_)
            | FetchError::RetriesExhausted { .. }
            | FetchError::Incomplete { .. } => false,
        }
    }
}

/// A stored cache entry that failed an internal consistency check.
///
/// Never fatal: the cache treats it as a miss and re-fetches.
#[derive(Debug, Error)]
pub enum CacheCorruption {
    #[error("entry {fingerprint} is stored under a different query key")]
    KeyMismatch { fingerprint: String },

    #[error("entry fetched at {fetched_at_ms}ms is newer than the clock ({now_ms}ms)")]
    NegativeAge { fetched_at_ms: u64, now_ms: u64 },

    #[error("entry {fingerprint} is malformed: {reason}")]
    Malformed { fingerprint: String, reason: String },
}

/// Failure to write report artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("destination {} is not a usable directory: {source}", path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to overwrite existing artifact {}\n  hint: use a fresh output directory for each run", path.display())]
    ArtifactExists { path: PathBuf },
}

/// All possible errors that can occur in bugstat-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cache corrupted: {0}")]
    CacheCorruption(#[from] CacheCorruption),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid priority: '{0}'\n  hint: valid priorities are: blocker, critical, major, minor, trivial, unknown")]
    InvalidPriority(String),

    #[error("invalid status: '{0}'\n  hint: valid statuses are: open, in_progress, resolved, closed, unknown")]
    InvalidStatus(String),
}

/// A specialized Result type for bugstat-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
