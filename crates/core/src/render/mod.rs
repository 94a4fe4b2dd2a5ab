// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report artifacts.
//!
//! [`ReportRenderer`] turns a [`PriorityStatusMatrix`] into two files in a
//! destination directory: a CSV table ([`TABLE_FILE`]) and an SVG pie chart
//! ([`CHART_FILE`]). Each file is staged in a temporary file next to its
//! final path and moved into place without replacing anything already
//! there, so a failed run never leaves a half-written artifact behind.

pub mod chart;
pub mod table;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::matrix::PriorityStatusMatrix;

/// File name of the table artifact.
pub const TABLE_FILE: &str = "bug_statistics.csv";

/// File name of the chart artifact.
pub const CHART_FILE: &str = "bug_priority_pie_chart.svg";

/// What to do with the chart when there are no issues to plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyChartPolicy {
    /// Write a chart with no wedges and a "No issues" note.
    #[default]
    Placeholder,
    /// Write no chart file at all.
    Omit,
}

/// The outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub matrix: PriorityStatusMatrix,
    pub table_artifact_path: PathBuf,
    /// `None` only for an empty matrix under [`EmptyChartPolicy::Omit`].
    pub chart_artifact_path: Option<PathBuf>,
}

/// Writes report artifacts.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    empty_chart: EmptyChartPolicy,
}

impl ReportRenderer {
    pub fn new(empty_chart: EmptyChartPolicy) -> Self {
        ReportRenderer { empty_chart }
    }

    pub fn empty_chart(&self) -> EmptyChartPolicy {
        self.empty_chart
    }

    /// Writes the table and chart for `matrix` into `destination`.
    ///
    /// `destination` must be an existing, writable directory that holds
    /// neither artifact yet. On error no artifact from this call remains.
    pub fn render(
        &self,
        matrix: &PriorityStatusMatrix,
        destination: &Path,
        generated_at: DateTime<Utc>,
    ) -> Result<Report, RenderError> {
        check_destination(destination)?;

        let table_path = destination.join(TABLE_FILE);
        let chart_path = destination.join(CHART_FILE);
        let want_chart = !(matrix.is_empty() && self.empty_chart == EmptyChartPolicy::Omit);

        for path in std::iter::once(&table_path).chain(want_chart.then_some(&chart_path)) {
            if path.exists() {
                return Err(RenderError::ArtifactExists { path: path.clone() });
            }
        }

        let table = stage(destination, &table_path, |out| table::write_csv(matrix, out))?;
        let chart = if want_chart {
            Some(stage(destination, &chart_path, |out| chart::write_svg(matrix, out))?)
        } else {
            debug!("matrix is empty, omitting chart");
            None
        };

        let chart_artifact_path = commit(table, &table_path, chart.map(|c| (c, chart_path)))?;

        debug!(destination = %destination.display(), "report written");
        Ok(Report {
            generated_at,
            matrix: matrix.clone(),
            table_artifact_path: table_path,
            chart_artifact_path,
        })
    }
}

fn check_destination(destination: &Path) -> Result<(), RenderError> {
    let unavailable = |source| RenderError::DestinationUnavailable {
        path: destination.to_path_buf(),
        source,
    };
    let meta = fs::metadata(destination).map_err(unavailable)?;
    if !meta.is_dir() {
        return Err(unavailable(io::Error::other("not a directory")));
    }
    Ok(())
}

/// Writes an artifact's bytes to a temp file in `dir`.
fn stage<F>(dir: &Path, target: &Path, write: F) -> Result<NamedTempFile, RenderError>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let unwritable = |source| RenderError::Unwritable { path: target.to_path_buf(), source };
    let mut file = NamedTempFile::new_in(dir).map_err(unwritable)?;
    write(&mut file).map_err(unwritable)?;
    file.as_file_mut().sync_all().map_err(unwritable)?;
    Ok(file)
}

/// Persists the staged table and chart. If the chart cannot be placed the
/// table is removed again.
fn commit(
    table: NamedTempFile,
    table_path: &Path,
    chart: Option<(NamedTempFile, PathBuf)>,
) -> Result<Option<PathBuf>, RenderError> {
    persist(table, table_path)?;
    let Some((staged, chart_path)) = chart else {
        return Ok(None);
    };
    if let Err(e) = persist(staged, &chart_path) {
        if let Err(cleanup) = fs::remove_file(table_path) {
            warn!(
                path = %table_path.display(),
                "failed to remove table after chart error: {}", cleanup
            );
        }
        return Err(e);
    }
    Ok(Some(chart_path))
}

/// Moves a staged file to `target`, refusing to replace an existing file.
fn persist(file: NamedTempFile, target: &Path) -> Result<(), RenderError> {
    file.persist_noclobber(target).map(|_| ()).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            RenderError::ArtifactExists { path: target.to_path_buf() }
        } else {
            RenderError::Unwritable { path: target.to_path_buf(), source: e.error }
        }
    })
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
