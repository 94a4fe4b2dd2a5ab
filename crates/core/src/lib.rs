// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bugstat-core: bug statistics from a remote issue tracker
//!
//! This crate fetches issues for a query (with a freshness-window cache in
//! front of the remote source), classifies each one by priority and status,
//! counts them into a priority × status matrix and renders the matrix as a
//! CSV table and an SVG pie chart.

pub mod cache;
pub mod classify;
pub mod clock;
pub mod error;
pub mod fetch;
pub mod issue;
pub mod matrix;
pub mod pipeline;
pub mod query;
pub mod render;

pub use cache::{CacheEntry, CacheStore, EntrySummary, IssueCache, MemoryStore, SqliteStore};
pub use classify::{Classification, Classifier};
pub use clock::{ClockSource, SystemClock};
pub use error::{CacheCorruption, Error, FetchError, RemoteRequest, RenderError, Result};
pub use fetch::{FetchPolicy, IssueFetcher, IssueSource, Page, PageRequest};
pub use issue::{Issue, Priority, Status};
pub use matrix::{Aggregator, PriorityStatusMatrix};
pub use pipeline::{Pipeline, RunRequest};
pub use query::QueryKey;
pub use render::{EmptyChartPolicy, Report, ReportRenderer};
