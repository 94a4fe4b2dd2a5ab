// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run output directories: `<output_dir>/<target>_<YYYYmmdd_HHMMSS>`.

use chrono::{DateTime, FixedOffset, Utc};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::Result;

/// Target used when the query names none.
pub const UNKNOWN_TARGET: &str = "Unknown";

// Hard-coded pattern, exercised by the target extraction tests.
static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r#"Target\s*=\s*"?(\w+)"#) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

/// Extracts the release target from a `Target = X` clause.
pub fn target_from_jql(jql: &str) -> String {
    TARGET_RE
        .captures(jql)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| UNKNOWN_TARGET.to_string(), |m| m.as_str().to_string())
}

/// Directory name for a run started at `now`, stamped in `offset` local time.
pub fn run_dir_name(target: &str, now: DateTime<Utc>, offset: FixedOffset) -> String {
    format!("{}_{}", target, now.with_timezone(&offset).format("%Y%m%d_%H%M%S"))
}

/// Most suffixed names tried before giving up on a fresh directory.
const MAX_SUFFIX: u32 = 100;

/// Creates a fresh run directory under `base`, creating `base` as needed.
///
/// If `name` is taken (two runs in the same second), `name_2`, `name_3` and
/// so on are tried instead. An existing directory is never reused.
pub fn create_run_dir(base: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(base)?;
    let mut dir = base.join(name);
    let mut suffix = 1;
    loop {
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && suffix < MAX_SUFFIX => {
                suffix += 1;
                dir = base.join(format!("{}_{}", name, suffix));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
