// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration.
//!
//! Configuration lives in a TOML file (`bugstat.toml` in the working
//! directory unless `--config` names another) with these sections:
//! - `[jira]`: server, credentials, priority and technology fields, page size
//! - `[fetch]`: retry, timeout and concurrency for page requests
//! - `[cache]`: database location, freshness window and retention
//! - `[report]`: output directory, timestamp offset, empty-chart policy and
//!   per-issue listings
//! - `[aliases.priority]` / `[aliases.status]`: extra label mappings
//!
//! Every key is optional; cache commands work with no file at all.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bugstat_core::{Classifier, EmptyChartPolicy, FetchPolicy, Priority, Status};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bugstat.toml";

/// Environment variable that overrides `jira.password`.
pub const PASSWORD_ENV: &str = "BUGSTAT_PASSWORD";

const CACHE_FILE_NAME: &str = "cache.db";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub jira: JiraConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
    pub report: ReportConfig,
    pub aliases: AliasConfig,
}

/// Connection to the Jira server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JiraConfig {
    pub server: String,
    pub username: String,
    pub password: Option<String>,
    /// Field holding the priority label. Sites with a custom urgency field
    /// set this to its id, e.g. `customfield_11214`.
    pub priority_field: String,
    /// Field shown in the Technology column of the issue listings.
    pub technology_field: Option<String>,
    pub page_size: usize,
}

impl Default for JiraConfig {
    fn default() -> Self {
        JiraConfig {
            server: String::new(),
            username: String::new(),
            password: None,
            priority_field: "priority".to_string(),
            technology_field: None,
            page_size: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub concurrency: usize,
    pub max_attempts: u32,
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub retry_backoff: Duration,
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        FetchConfig {
            concurrency: policy.concurrency,
            max_attempts: policy.max_attempts,
            retry_backoff: policy.retry_backoff,
            request_timeout: policy.request_timeout,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Database file. Defaults to `bugstat/cache.db` under the user data dir.
    pub path: Option<PathBuf>,
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub freshness: Duration,
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub retention: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            path: None,
            freshness: Duration::from_secs(15 * 60),
            retention: Duration::from_secs(7 * 86_400),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Offset for run directory timestamps and issue creation times.
    #[serde(deserialize_with = "deserialize_offset")]
    pub utc_offset: FixedOffset,
    pub empty_chart: EmptyChartPolicy,
    /// Write the per-issue listings next to the table and chart.
    pub details: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            output_dir: PathBuf::from("Report"),
            utc_offset: FixedOffset::east_opt(8 * 3600).unwrap_or_else(|| Utc.fix()),
            empty_chart: EmptyChartPolicy::default(),
            details: true,
        }
    }
}

/// Site-specific label mappings, applied before the built-in ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasConfig {
    #[serde(deserialize_with = "deserialize_aliases")]
    pub priority: BTreeMap<String, Priority>,
    #[serde(deserialize_with = "deserialize_aliases")]
    pub status: BTreeMap<String, Status>,
}

impl Config {
    /// Loads configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound(path.display().to_string())
            } else {
                Error::Config(format!("failed to read {}: {}", path.display(), e))
            }
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Loads `explicit` if given, else [`CONFIG_FILE_NAME`] from the working
    /// directory if present, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(CONFIG_FILE_NAME);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Checks the settings a report run needs.
    pub fn require_jira(&self) -> Result<()> {
        if self.jira.server.trim().is_empty() {
            return Err(Error::MissingSetting { field: "jira.server" });
        }
        if self.jira.username.trim().is_empty() {
            return Err(Error::MissingSetting { field: "jira.username" });
        }
        if self.password().is_none() {
            return Err(Error::MissingSetting { field: "jira.password" });
        }
        if self.jira.page_size == 0 {
            return Err(Error::Config("jira.page_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The password from the environment, falling back to the file.
    pub fn password(&self) -> Option<String> {
        std::env::var(PASSWORD_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| self.jira.password.clone())
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_attempts: self.fetch.max_attempts,
            retry_backoff: self.fetch.retry_backoff,
            request_timeout: self.fetch.request_timeout,
            concurrency: self.fetch.concurrency,
        }
    }

    /// A classifier with the configured aliases registered.
    pub fn classifier(&self) -> Classifier {
        let with_priorities = self
            .aliases
            .priority
            .iter()
            .fold(Classifier::new(), |c, (label, &p)| c.with_priority_alias(label, p));
        self.aliases
            .status
            .iter()
            .fold(with_priorities, |c, (label, &s)| c.with_status_alias(label, s))
    }

    /// Location of the cache database.
    pub fn cache_path(&self) -> PathBuf {
        match &self.cache.path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .map(|d| d.join("bugstat"))
                .unwrap_or_else(|| PathBuf::from(".bugstat"))
                .join(CACHE_FILE_NAME),
        }
    }
}

/// Parses `+HH:MM` / `-HH:MM` offsets.
pub fn parse_offset(s: &str) -> Result<FixedOffset> {
    let invalid = || Error::InvalidOffset(s.to_string());
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn deserialize_offset<'de, D>(deserializer: D) -> std::result::Result<FixedOffset, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_offset(&raw).map_err(serde::de::Error::custom)
}

/// Alias targets accept whatever `FromStr` accepts, e.g. `"In Progress"`.
fn deserialize_aliases<'de, D, T>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    BTreeMap::<String, String>::deserialize(deserializer)?
        .into_iter()
        .map(|(label, target)| {
            let parsed = target.parse().map_err(serde::de::Error::custom)?;
            Ok((label, parsed))
        })
        .collect()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
