// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping raw tracker labels onto [`Priority`] and [`Status`].
//!
//! Classification is total: a missing, empty or unrecognized label yields
//! the `Unknown` variant instead of an error.

use std::collections::HashMap;

use crate::issue::{Issue, Priority, Status};

/// The `(priority, status)` pair an issue is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub priority: Priority,
    pub status: Status,
}

impl Classification {
    pub fn new(priority: Priority, status: Status) -> Self {
        Classification { priority, status }
    }
}

/// Maps issues to a [`Classification`].
///
/// Built-in labels cover the enum names, Jira's default priority scheme and
/// the `U0`..`U3` urgency scale. Aliases registered on the classifier take
/// precedence over the built-ins.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    priority_aliases: HashMap<String, Priority>,
    status_aliases: HashMap<String, Status>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the tracker label `label` to `priority`.
    pub fn with_priority_alias(mut self, label: &str, priority: Priority) -> Self {
        self.priority_aliases.insert(normalize_label(label), priority);
        self
    }

    /// Maps the tracker label `label` to `status`.
    pub fn with_status_alias(mut self, label: &str, status: Status) -> Self {
        self.status_aliases.insert(normalize_label(label), status);
        self
    }

    pub fn classify(&self, issue: &Issue) -> Classification {
        Classification {
            priority: self.priority_of(issue.priority.as_deref()),
            status: self.status_of(issue.status.as_deref()),
        }
    }

    /// Classifies a single priority label.
    pub fn priority_of(&self, label: Option<&str>) -> Priority {
        let Some(key) = label.map(normalize_label).filter(|k| !k.is_empty()) else {
            return Priority::Unknown;
        };
        if let Some(priority) = self.priority_aliases.get(&key) {
            return *priority;
        }
        builtin_priority(&key)
    }

    /// Classifies a single status label.
    pub fn status_of(&self, label: Option<&str>) -> Status {
        let Some(key) = label.map(normalize_label).filter(|k| !k.is_empty()) else {
            return Status::Unknown;
        };
        if let Some(status) = self.status_aliases.get(&key) {
            return *status;
        }
        builtin_status(&key)
    }
}

/// Lowercases, trims, treats `_` and `-` as spaces and collapses whitespace.
pub fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin_priority(key: &str) -> Priority {
    match key {
        "blocker" | "highest" | "u0 blocking" | "u0" => Priority::Blocker,
        "critical" | "high" | "u1 urgent" | "u1" => Priority::Critical,
        "major" | "medium" | "normal" | "u2 normal" | "u2" => Priority::Major,
        "minor" | "low" | "u3 low" | "u3" => Priority::Minor,
        "trivial" | "lowest" => Priority::Trivial,
        _ => Priority::Unknown,
    }
}

fn builtin_status(key: &str) -> Status {
    match key {
        "open" | "to do" | "todo" | "reopened" | "backlog" | "new" => Status::Open,
        "in progress" | "in review" | "in development" => Status::InProgress,
        "resolved" | "done" | "fixed" => Status::Resolved,
        "closed" => Status::Closed,
        _ => Status::Unknown,
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
