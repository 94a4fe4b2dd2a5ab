// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-issue listings written next to the report table and chart.
//!
//! Every run gets [`ALL_FILE`] with one row per fetched issue. Resolved
//! issues and each non-empty priority also get their own file. Listings that
//! are meant for triage (resolved, blocker and critical) carry an empty
//! `Comment` column for reviewers to fill in.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use bugstat_core::{Classifier, Issue, Priority, Status};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::{debug, warn};

use crate::jira::field_label;

/// Listing of every issue in the run.
pub const ALL_FILE: &str = "bug_issues.csv";

/// Listing of the issues whose status classifies as resolved.
pub const RESOLVED_FILE: &str = "bug_issues_resolved.csv";

const COLUMNS: [&str; 9] = [
    "Issue Key",
    "Issue ID",
    "Summary",
    "Status",
    "Priority",
    "Technology",
    "Reporter",
    "Assignee",
    "Created",
];

const COMMENT_COLUMN: &str = "Comment";

/// One issue as shown in a listing. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueRow {
    pub key: String,
    pub id: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub technology: String,
    pub reporter: String,
    pub assignee: String,
    /// Creation time in the report offset, `YYYY-mm-dd HH:MM`.
    pub created: String,
}

impl IssueRow {
    pub fn from_issue(issue: &Issue, technology_field: Option<&str>, offset: FixedOffset) -> Self {
        let fields = issue.raw.get("fields");
        let text = |name: &str| {
            fields
                .and_then(|f| f.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };
        let person = |name: &str| {
            fields
                .and_then(|f| f.get(name))
                .and_then(|p| p.get("displayName"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };

        IssueRow {
            key: issue.id.clone(),
            id: issue.raw.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
            summary: text("summary"),
            status: issue.status.clone().unwrap_or_default(),
            priority: issue.priority.clone().unwrap_or_default(),
            technology: technology_field
                .and_then(|name| fields.and_then(|f| f.get(name)))
                .and_then(field_label)
                .unwrap_or_default(),
            reporter: person("reporter"),
            assignee: person("assignee"),
            created: format_created(&text("created"), offset),
        }
    }

    fn record(&self) -> [&str; 9] {
        [
            self.key.as_str(),
            self.id.as_str(),
            self.summary.as_str(),
            self.status.as_str(),
            self.priority.as_str(),
            self.technology.as_str(),
            self.reporter.as_str(),
            self.assignee.as_str(),
            self.created.as_str(),
        ]
    }
}

/// Converts a Jira timestamp such as `2026-02-27T10:15:30.000+0000` to
/// `offset` and formats it as `YYYY-mm-dd HH:MM`. Unparseable input is
/// returned unchanged.
pub fn format_created(raw: &str, offset: FixedOffset) -> String {
    let parsed = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_rfc3339(raw));
    match parsed {
        Ok(time) => time.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One listing file and its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub file_name: String,
    pub with_comment: bool,
    pub rows: Vec<IssueRow>,
}

/// Groups `issues` into listings: all issues, resolved issues and one per
/// priority in severity order. Only the all-issues listing may be empty.
pub fn listings(
    issues: &[Issue],
    classifier: &Classifier,
    technology_field: Option<&str>,
    offset: FixedOffset,
) -> Vec<Listing> {
    let classified: Vec<_> = issues
        .iter()
        .map(|issue| {
            (classifier.classify(issue), IssueRow::from_issue(issue, technology_field, offset))
        })
        .collect();

    let mut out = vec![Listing {
        file_name: ALL_FILE.to_string(),
        with_comment: false,
        rows: classified.iter().map(|(_, row)| row.clone()).collect(),
    }];

    let resolved: Vec<IssueRow> = classified
        .iter()
        .filter(|(c, _)| c.status == Status::Resolved)
        .map(|(_, row)| row.clone())
        .collect();
    if !resolved.is_empty() {
        out.push(Listing {
            file_name: RESOLVED_FILE.to_string(),
            with_comment: true,
            rows: resolved,
        });
    }

    for priority in Priority::ALL {
        let rows: Vec<IssueRow> = classified
            .iter()
            .filter(|(c, _)| c.priority == priority)
            .map(|(_, row)| row.clone())
            .collect();
        if rows.is_empty() {
            continue;
        }
        out.push(Listing {
            file_name: priority_file(priority),
            with_comment: matches!(priority, Priority::Blocker | Priority::Critical),
            rows,
        });
    }
    out
}

/// File name of the listing for one priority, e.g. `bug_issues_critical.csv`.
pub fn priority_file(priority: Priority) -> String {
    format!("bug_issues_{}.csv", priority.as_str())
}

/// Writes `listing` as CSV.
pub fn write_listing<W: Write>(listing: &Listing, out: W) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let mut header: Vec<&str> = COLUMNS.to_vec();
    if listing.with_comment {
        header.push(COMMENT_COLUMN);
    }
    writer.write_record(&header)?;
    for row in &listing.rows {
        let mut record: Vec<&str> = row.record().to_vec();
        if listing.with_comment {
            record.push("");
        }
        writer.write_record(&record)?;
    }
    writer.flush()
}

/// Writes every listing into `dir`, refusing to replace existing files.
///
/// On error the files written by this call are removed again.
pub fn write_all(listings: &[Listing], dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(listings.len());
    for listing in listings {
        let path = dir.join(&listing.file_name);
        if let Err(e) = write_file(listing, &path) {
            remove_written(&written);
            return Err(e);
        }
        written.push(path);
    }
    debug!(dir = %dir.display(), files = written.len(), "issue listings written");
    Ok(written)
}

fn write_file(listing: &Listing, path: &Path) -> io::Result<()> {
    let file = File::create_new(path)?;
    let mut out = BufWriter::new(file);
    let written = write_listing(listing, &mut out)
        .and_then(|()| out.flush())
        .and_then(|()| out.get_ref().sync_all());
    if written.is_err() {
        remove_written(&[path.to_path_buf()]);
    }
    written
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), "failed to remove issue listing: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "details_tests.rs"]
mod tests;
