// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Paginated issue fetching.
//!
//! [`IssueFetcher`] drives an [`IssueSource`] page by page. The first page is
//! requested on its own; if it reports the total result count, the remaining
//! pages are requested concurrently (bounded by
//! [`FetchPolicy::concurrency`]) and reassembled in page order. Otherwise
//! pages are walked sequentially until a short page comes back.
//!
//! Every page attempt is bounded by a timeout, and a failing page is retried
//! on its own without re-requesting pages that already arrived.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::error::{FetchError, RemoteRequest};
use crate::issue::Issue;
use crate::query::QueryKey;

/// Position of one page within a query's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number.
    pub index: usize,
    /// Offset of the first issue on the page.
    pub start_at: usize,
    pub max_results: usize,
}

impl PageRequest {
    pub fn nth(index: usize, page_size: usize) -> Self {
        PageRequest { index, start_at: index.saturating_mul(page_size), max_results: page_size }
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub issues: Vec<Issue>,
    /// Total number of issues matching the query, when the source knows it.
    pub total: Option<usize>,
}

/// A remote reader of issue pages.
#[async_trait]
pub trait IssueSource: Send + Sync {
    async fn fetch_page(&self, query: &QueryKey, page: PageRequest) -> Result<Page, FetchError>;
}

#[async_trait]
impl<T: IssueSource + ?Sized> IssueSource for std::sync::Arc<T> {
    async fn fetch_page(&self, query: &QueryKey, page: PageRequest) -> Result<Page, FetchError> {
        (**self).fetch_page(query, page).await
    }
}

/// Retry, timeout and fan-out settings for [`IssueFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Attempts per request, including the first. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Delay before the first retry; later retries wait proportionally longer.
    pub retry_backoff: Duration,
    /// Upper bound on a single attempt.
    pub request_timeout: Duration,
    /// Pages requested at once after the first.
    pub concurrency: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            concurrency: 4,
        }
    }
}

impl FetchPolicy {
    /// Runs one remote call under the per-attempt timeout, retrying
    /// retryable failures until the attempt budget is spent.
    pub async fn run<T, F, Fut>(&self, request: RemoteRequest, mut call: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let timeout = self.request_timeout;
        let mut attempt = 1;
        loop {
            let result = tokio::time::timeout(timeout, call())
                .await
                .unwrap_or(Err(FetchError::Timeout { request, after: timeout }));

            match result {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(if max_attempts == 1 {
                        e
                    } else {
                        FetchError::RetriesExhausted {
                            request,
                            attempts: attempt,
                            source: Box::new(e),
                        }
                    });
                }
                Err(e) => {
                    warn!(%request, attempt, "request failed, retrying: {}", e);
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Pulls every issue for a query out of an [`IssueSource`].
pub struct IssueFetcher<S: IssueSource> {
    source: S,
    policy: FetchPolicy,
}

impl<S: IssueSource> IssueFetcher<S> {
    pub fn new(source: S, policy: FetchPolicy) -> Self {
        IssueFetcher { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetches all pages of `query`, in page order.
    pub async fn fetch(&self, query: &QueryKey) -> Result<Vec<Issue>, FetchError> {
        let page_size = query.page_size();
        let first = self.fetch_page(query, PageRequest::nth(0, page_size)).await?;
        let mut issues = first.issues;

        match first.total {
            _ if issues.is_empty() => {}
            Some(total) => {
                // Servers may cap the page size below what was asked for.
                let step = if issues.len() < page_size && issues.len() < total {
                    issues.len()
                } else {
                    page_size
                };
                let pages = total.div_ceil(step);
                debug!(query = %query, total, pages, "fetching remaining pages concurrently");
                let mut rest = stream::iter(1..pages)
                    .map(|index| self.fetch_page(query, PageRequest::nth(index, step)))
                    .buffered(self.policy.concurrency.max(1));
                while let Some(page) = rest.next().await {
                    match page {
                        Ok(page) => issues.extend(page.issues),
                        Err(e) => return Err(incomplete(issues, e)),
                    }
                }
            }
            None => {
                let mut last_len = issues.len();
                let mut index = 1;
                while last_len == page_size {
                    let request = PageRequest::nth(index, page_size);
                    let page = match self.fetch_page(query, request).await {
                        Ok(page) => page,
                        Err(e) => return Err(incomplete(issues, e)),
                    };
                    last_len = page.issues.len();
                    issues.extend(page.issues);
                    index += 1;
                }
            }
        }

        debug!(query = %query, issues = issues.len(), "fetch complete");
        Ok(issues)
    }

    async fn fetch_page(&self, query: &QueryKey, page: PageRequest) -> Result<Page, FetchError> {
        self.policy
            .run(RemoteRequest::Page(page.index), || self.source.fetch_page(query, page))
            .await
    }
}

/// Wraps a page failure so the issues fetched before it are not lost.
fn incomplete(partial: Vec<Issue>, source: FetchError) -> FetchError {
    if partial.is_empty() {
        source
    } else {
        FetchError::Incomplete { partial, source: Box::new(source) }
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
