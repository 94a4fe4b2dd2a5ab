// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Query identity for fetches and cache lookups.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifies one fetch request against a remote source.
///
/// Construction normalizes its inputs, so two keys built from equivalent
/// inputs compare equal and share a [`fingerprint`](QueryKey::fingerprint).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    source: String,
    filter: String,
    page_size: usize,
}

impl QueryKey {
    /// Creates a key for `filter` against `source`, fetched `page_size` issues at a time.
    ///
    /// Trailing slashes are stripped from `source`, runs of whitespace in
    /// `filter` are collapsed, and a zero page size is raised to one.
    pub fn new(source: &str, filter: &str, page_size: usize) -> Self {
        QueryKey {
            source: source.trim().trim_end_matches('/').to_string(),
            filter: filter.split_whitespace().collect::<Vec<_>>().join(" "),
            page_size: page_size.max(1),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Stable hex digest of the key, used as the storage index.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"bugstat-query-v1\0");
        hasher.update(self.source.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.filter.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.page_size.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] (page size {})", self.source, self.filter, self.page_size)
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
