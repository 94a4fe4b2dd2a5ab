// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use bugstat_core::{CacheStore, ClockSource, EntrySummary, SystemClock};

use super::open_store;
use crate::config::Config;
use crate::error::Result;

/// Prints the cached queries, oldest first.
pub fn list(config: &Config) -> Result<()> {
    let entries = open_store(config)?.entries()?;
    print!("{}", render_entries(&entries, SystemClock.now_ms()));
    Ok(())
}

/// Removes every cached query.
pub fn clear(config: &Config) -> Result<()> {
    let removed = open_store(config)?.clear()?;
    let noun = if removed == 1 { "query" } else { "queries" };
    println!("Removed {} cached {}", removed, noun);
    Ok(())
}

pub(crate) fn render_entries(entries: &[EntrySummary], now_ms: u64) -> String {
    if entries.is_empty() {
        return "No cached queries\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let short = entry.fingerprint.get(..12).unwrap_or(&entry.fingerprint);
        out.push_str(&format!(
            "{}  {:>6} issues  {:>4} ago  {}\n",
            short,
            entry.issue_count,
            format_age(now_ms.saturating_sub(entry.fetched_at_ms)),
            entry.key
        ));
    }
    out
}

/// Formats an age in the largest whole unit: `42s`, `5m`, `3h`, `2d`.
pub(crate) fn format_age(ms: u64) -> String {
    let secs = ms / 1000;
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s => format!("{}d", s / 86_400),
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
