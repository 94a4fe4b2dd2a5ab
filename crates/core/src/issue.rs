// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core issue types for bugstat.
//!
//! This module contains the raw [`Issue`] record produced by a remote source
//! and the two fixed enumerations it is classified into: [`Priority`] and
//! [`Status`]. Both enumerations declare their variants in display order,
//! so the derived `Ord` is the order rows and columns appear in reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single bug record as delivered by the remote tracker.
///
/// `priority` and `status` hold the tracker's labels verbatim; mapping them
/// onto [`Priority`] and [`Status`] is the classifier's job. Everything else
/// the source returned is kept in `raw` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Tracker key, e.g. `BUG-1234`.
    pub id: String,
    /// Raw priority label, `None` when the field was absent or null.
    pub priority: Option<String>,
    /// Raw workflow status label, `None` when the field was absent or null.
    pub status: Option<String>,
    /// Opaque passthrough of the remote payload.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl Issue {
    /// Creates an issue with no labels and an empty payload.
    pub fn new(id: impl Into<String>) -> Self {
        Issue { id: id.into(), priority: None, status: None, raw: serde_json::Value::Null }
    }

    pub fn with_priority(mut self, label: impl Into<String>) -> Self {
        self.priority = Some(label.into());
        self
    }

    pub fn with_status(mut self, label: impl Into<String>) -> Self {
        self.status = Some(label.into());
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}

/// Severity of an issue, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Blocks a release or a team; drop everything.
    Blocker,
    /// Severe impact, must be fixed soon.
    Critical,
    /// Normal priority.
    Major,
    /// Low impact.
    Minor,
    /// Cosmetic.
    Trivial,
    /// The tracker's label matched nothing known, or was missing.
    Unknown,
}

impl Priority {
    /// All priorities in display order, `Unknown` last.
    pub const ALL: [Priority; 6] = [
        Priority::Blocker,
        Priority::Critical,
        Priority::Major,
        Priority::Minor,
        Priority::Trivial,
        Priority::Unknown,
    ];

    /// Returns the string representation used in config and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Blocker => "blocker",
            Priority::Critical => "critical",
            Priority::Major => "major",
            Priority::Minor => "minor",
            Priority::Trivial => "trivial",
            Priority::Unknown => "unknown",
        }
    }

    /// Returns the human-readable label used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Blocker => "Blocker",
            Priority::Critical => "Critical",
            Priority::Major => "Major",
            Priority::Minor => "Minor",
            Priority::Trivial => "Trivial",
            Priority::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "blocker" => Ok(Priority::Blocker),
            "critical" => Ok(Priority::Critical),
            "major" => Ok(Priority::Major),
            "minor" => Ok(Priority::Minor),
            "trivial" => Ok(Priority::Trivial),
            "unknown" => Ok(Priority::Unknown),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

/// Workflow state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not yet started (To Do, Reopened, Backlog).
    Open,
    /// Currently being worked on.
    InProgress,
    /// Fixed, awaiting verification.
    Resolved,
    /// Done and verified, or closed without a fix.
    Closed,
    /// The tracker's label matched nothing known, or was missing.
    Unknown,
}

impl Status {
    /// All statuses in display order, `Unknown` last.
    pub const ALL: [Status; 5] =
        [Status::Open, Status::InProgress, Status::Resolved, Status::Closed, Status::Unknown];

    /// Returns the string representation used in config and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
            Status::Unknown => "unknown",
        }
    }

    /// Returns the human-readable label used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
            Status::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "open" => Ok(Status::Open),
            "in_progress" | "inprogress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "closed" => Ok(Status::Closed),
            "unknown" => Ok(Status::Unknown),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
