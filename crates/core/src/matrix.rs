// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Priority × status cross-tabulation.
//!
//! [`Aggregator`] folds issues into a [`PriorityStatusMatrix`] in one pass.
//! Every step is a counter increment, so the result does not depend on the
//! order issues arrive in.

use std::collections::BTreeMap;

use crate::classify::{Classification, Classifier};
use crate::issue::{Issue, Priority, Status};

/// Issue counts by `(priority, status)` with marginal totals.
///
/// Only non-zero counts are stored; lookups of anything else return 0.
/// Invariants: the cells sum to [`grand_total`](Self::grand_total), and each
/// row and column total equals the sum of its cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityStatusMatrix {
    cells: BTreeMap<(Priority, Status), u64>,
    row_totals: BTreeMap<Priority, u64>,
    col_totals: BTreeMap<Status, u64>,
    grand_total: u64,
}

impl PriorityStatusMatrix {
    /// An empty matrix: every count and total is zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, class: Classification) {
        *self.cells.entry((class.priority, class.status)).or_insert(0) += 1;
        *self.row_totals.entry(class.priority).or_insert(0) += 1;
        *self.col_totals.entry(class.status).or_insert(0) += 1;
        self.grand_total += 1;
    }

    pub fn count(&self, priority: Priority, status: Status) -> u64 {
        self.cells.get(&(priority, status)).copied().unwrap_or(0)
    }

    pub fn row_total(&self, priority: Priority) -> u64 {
        self.row_totals.get(&priority).copied().unwrap_or(0)
    }

    pub fn col_total(&self, status: Status) -> u64 {
        self.col_totals.get(&status).copied().unwrap_or(0)
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    pub fn is_empty(&self) -> bool {
        self.grand_total == 0
    }

    /// Non-zero cells in `(priority, status)` display order.
    pub fn cells(&self) -> &BTreeMap<(Priority, Status), u64> {
        &self.cells
    }

    /// Non-zero row totals in priority display order.
    pub fn row_totals(&self) -> &BTreeMap<Priority, u64> {
        &self.row_totals
    }

    /// Non-zero column totals in status display order.
    pub fn col_totals(&self) -> &BTreeMap<Status, u64> {
        &self.col_totals
    }

    /// Checks the summation invariants.
    pub fn is_consistent(&self) -> bool {
        let cell_sum: u64 = self.cells.values().sum();
        let rows_ok = Priority::ALL.iter().all(|&p| {
            Status::ALL.iter().map(|&s| self.count(p, s)).sum::<u64>() == self.row_total(p)
        });
        let cols_ok = Status::ALL.iter().all(|&s| {
            Priority::ALL.iter().map(|&p| self.count(p, s)).sum::<u64>() == self.col_total(s)
        });
        cell_sum == self.grand_total && rows_ok && cols_ok
    }
}

impl FromIterator<Classification> for PriorityStatusMatrix {
    fn from_iter<I: IntoIterator<Item = Classification>>(iter: I) -> Self {
        let mut matrix = PriorityStatusMatrix::new();
        for class in iter {
            matrix.record(class);
        }
        matrix
    }
}

/// Builds a [`PriorityStatusMatrix`] from issues.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    classifier: Classifier,
}

impl Aggregator {
    pub fn new(classifier: Classifier) -> Self {
        Aggregator { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Classifies every issue and counts it once.
    pub fn aggregate(&self, issues: &[Issue]) -> PriorityStatusMatrix {
        issues.iter().map(|issue| self.classifier.classify(issue)).collect()
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
