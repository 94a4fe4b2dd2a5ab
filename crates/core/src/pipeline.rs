// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One report run: fetch through the cache, aggregate, render.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheStore, IssueCache};
use crate::clock::{ClockSource, SystemClock};
use crate::error::Result;
use crate::fetch::{IssueFetcher, IssueSource};
use crate::issue::{Issue, Priority, Status};
use crate::matrix::Aggregator;
use crate::query::QueryKey;
use crate::render::{Report, ReportRenderer};

/// Parameters of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub query: QueryKey,
    /// Cached results younger than this are reused.
    pub freshness: Duration,
    /// Skip the cache lookup and always fetch.
    pub force_refresh: bool,
}

impl RunRequest {
    pub fn new(query: QueryKey, freshness: Duration) -> Self {
        RunRequest { query, freshness, force_refresh: false }
    }

    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }
}

/// Wires the fetcher, cache, aggregator and renderer together.
pub struct Pipeline<S: IssueSource, St: CacheStore, C: ClockSource = SystemClock> {
    fetcher: IssueFetcher<S>,
    cache: IssueCache<St, C>,
    aggregator: Aggregator,
    renderer: ReportRenderer,
}

impl<S: IssueSource, St: CacheStore, C: ClockSource> Pipeline<S, St, C> {
    pub fn new(
        fetcher: IssueFetcher<S>,
        cache: IssueCache<St, C>,
        aggregator: Aggregator,
        renderer: ReportRenderer,
    ) -> Self {
        Pipeline { fetcher, cache, aggregator, renderer }
    }

    pub fn cache(&self) -> &IssueCache<St, C> {
        &self.cache
    }

    /// Runs [`collect`](Self::collect) then [`report`](Self::report).
    pub async fn run(&self, request: &RunRequest, destination: &Path) -> Result<Report> {
        let issues = self.collect(request).await?;
        self.report(&issues, destination)
    }

    /// Returns the issues for the request, from the cache when fresh.
    pub async fn collect(&self, request: &RunRequest) -> Result<Vec<Issue>> {
        let fetch = |query: QueryKey| async move { self.fetcher.fetch(&query).await };
        let issues = if request.force_refresh {
            self.cache.refresh(&request.query, fetch).await?
        } else {
            self.cache.get_or_fetch(&request.query, request.freshness, fetch).await?
        };
        info!(query = %request.query, issues = issues.len(), "collected issues");
        Ok(issues)
    }

    /// Aggregates `issues` and writes the report artifacts into `destination`.
    pub fn report(&self, issues: &[Issue], destination: &Path) -> Result<Report> {
        self.warn_unclassified(issues);
        let matrix = self.aggregator.aggregate(issues);
        let generated_at = self.cache.clock().now_utc();
        Ok(self.renderer.render(&matrix, destination, generated_at)?)
    }

    fn warn_unclassified(&self, issues: &[Issue]) {
        let classifier = self.aggregator.classifier();
        let mut unknown_priority = 0usize;
        let mut unknown_status = 0usize;
        for issue in issues {
            let class = classifier.classify(issue);
            if class.priority == Priority::Unknown {
                unknown_priority += 1;
                debug!(issue = %issue.id, label = ?issue.priority, "unrecognized priority");
            }
            if class.status == Status::Unknown {
                unknown_status += 1;
                debug!(issue = %issue.id, label = ?issue.status, "unrecognized status");
            }
        }
        if unknown_priority > 0 || unknown_status > 0 {
            warn!(
                unknown_priority,
                unknown_status,
                "some issues have unrecognized labels and are counted as Unknown"
            );
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
