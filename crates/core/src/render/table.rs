// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tabular views of a [`PriorityStatusMatrix`].
//!
//! Rows are priorities with a non-zero total, in display order; columns are
//! every status in display order. Both views end with a `Total` column and a
//! `Total` row.

use std::io::Write;

use crate::issue::{Priority, Status};
use crate::matrix::PriorityStatusMatrix;

const TOTAL: &str = "Total";

/// Yields the table as rows of cells, header first.
fn rows(matrix: &PriorityStatusMatrix) -> Vec<Vec<String>> {
    let mut header = vec!["Priority".to_string()];
    header.extend(Status::ALL.iter().map(|s| s.label().to_string()));
    header.push(TOTAL.to_string());

    let mut rows = vec![header];
    for priority in Priority::ALL {
        let total = matrix.row_total(priority);
        if total == 0 {
            continue;
        }
        let mut row = vec![priority.label().to_string()];
        row.extend(Status::ALL.iter().map(|&s| matrix.count(priority, s).to_string()));
        row.push(total.to_string());
        rows.push(row);
    }

    let mut totals = vec![TOTAL.to_string()];
    totals.extend(Status::ALL.iter().map(|&s| matrix.col_total(s).to_string()));
    totals.push(matrix.grand_total().to_string());
    rows.push(totals);
    rows
}

/// Writes the table as CSV.
pub fn write_csv<W: Write>(matrix: &PriorityStatusMatrix, out: W) -> std::io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows(matrix) {
        writer.write_record(&row)?;
    }
    writer.flush()
}

/// Renders the table as aligned plain text for terminal output.
pub fn to_text(matrix: &PriorityStatusMatrix) -> String {
    let rows = rows(matrix);
    let columns = rows.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].len()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (c, cell) in row.iter().enumerate() {
            if c == 0 {
                line.push_str(&format!("{:<width$}", cell, width = widths[c]));
            } else {
                line.push_str(&format!("  {:>width$}", cell, width = widths[c]));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
