// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cache;
pub mod report;

use bugstat_core::SqliteStore;

use crate::config::Config;
use crate::error::Result;

/// Opens the cache database named by the config.
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.cache_path();
    tracing::debug!(path = %path.display(), "opening cache");
    Ok(SqliteStore::open(&path)?)
}
