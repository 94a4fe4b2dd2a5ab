// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Jira REST client.
//!
//! [`JiraSource`] implements [`IssueSource`] over the v2 REST API: saved
//! filters are resolved through `/rest/api/2/filter/{id}` and issue pages
//! come from `/rest/api/2/search`.

use async_trait::async_trait;
use bugstat_core::{FetchError, Issue, IssueSource, Page, PageRequest, QueryKey, RemoteRequest};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::JiraConfig;

const SEARCH_PATH: &str = "/rest/api/2/search";
const FILTER_PATH: &str = "/rest/api/2/filter";

/// Fields every search asks for besides the priority and technology fields.
const DETAIL_FIELDS: [&str; 5] = ["status", "summary", "reporter", "assignee", "created"];

/// Longest response excerpt carried in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Issue source backed by a Jira server.
pub struct JiraSource {
    client: Client,
    server: String,
    username: String,
    password: String,
    priority_field: String,
    fields: String,
    request_timeout: Duration,
}

impl JiraSource {
    /// Builds a client whose every request, body included, is bounded by
    /// `request_timeout`.
    pub fn new(
        config: &JiraConfig,
        password: String,
        request_timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .timeout(request_timeout)
            .user_agent(concat!("bugstat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Unreachable(format!("cannot build HTTP client: {e}")))?;
        Ok(JiraSource {
            client,
            server: config.server.trim().trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password,
            priority_field: config.priority_field.clone(),
            fields: search_fields(config),
            request_timeout,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Looks up the JQL behind a saved filter.
    pub async fn resolve_filter(&self, filter_id: &str) -> Result<String, FetchError> {
        let url = format!("{}{}/{}", self.server, FILTER_PATH, filter_id.trim());
        let body = self.send(self.client.get(&url), RemoteRequest::Filter).await?;
        body.get("jql")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FetchError::Decode(format!("filter {filter_id} has no jql")))
    }

    async fn send(&self, request: RequestBuilder, what: RemoteRequest) -> Result<Value, FetchError> {
        let timed_out = || FetchError::Timeout { request: what, after: self.request_timeout };
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    timed_out()
                } else {
                    FetchError::Unreachable(e.to_string())
                }
            })?;
        let response = check_status(response).await?;
        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                timed_out()
            } else {
                FetchError::Decode(e.to_string())
            }
        })
    }
}

#[async_trait]
impl IssueSource for JiraSource {
    async fn fetch_page(&self, query: &QueryKey, page: PageRequest) -> Result<Page, FetchError> {
        let url = format!("{}{}", self.server, SEARCH_PATH);
        let start_at = page.start_at.to_string();
        let max_results = page.max_results.to_string();
        debug!(page = page.index, start_at = page.start_at, "requesting issue page");

        let request = self.client.get(&url).query(&[
            ("jql", query.filter()),
            ("startAt", start_at.as_str()),
            ("maxResults", max_results.as_str()),
            ("fields", self.fields.as_str()),
        ]);
        let body = self.send(request, RemoteRequest::Page(page.index)).await?;
        parse_search_page(&body, &self.priority_field)
    }
}

/// The `fields` parameter for searches: priority, detail columns and the
/// optional technology field, without duplicates.
pub(crate) fn search_fields(config: &JiraConfig) -> String {
    let mut fields: Vec<&str> = vec![config.priority_field.as_str()];
    fields.extend(DETAIL_FIELDS);
    fields.extend(config.technology_field.as_deref());
    let mut unique: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        if !unique.contains(&field) {
            unique.push(field);
        }
    }
    unique.join(",")
}

async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Maps a non-success HTTP status to a fetch error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> FetchError {
    let mut message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("no response body").to_string();
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::Unauthorized(format!("HTTP {}", status.as_u16()))
        }
        _ => FetchError::Status { code: status.as_u16(), message },
    }
}

/// Decodes one `/search` response body.
pub(crate) fn parse_search_page(body: &Value, priority_field: &str) -> Result<Page, FetchError> {
    let entries = body
        .get("issues")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Decode("search response has no issues array".to_string()))?;

    let mut issues = Vec::with_capacity(entries.len());
    for entry in entries {
        let id = entry
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Decode("issue without a key".to_string()))?;
        let fields = entry.get("fields");
        let mut issue = Issue::new(id).with_raw(entry.clone());
        issue.priority = fields.and_then(|f| f.get(priority_field)).and_then(field_label);
        issue.status = fields.and_then(|f| f.get("status")).and_then(field_label);
        issues.push(issue);
    }

    let total = body.get("total").and_then(Value::as_u64).and_then(|t| usize::try_from(t).ok());
    Ok(Page { issues, total })
}

/// Extracts a display label from a field value: a plain string, or an
/// object carrying `value` (custom select fields) or `name`.
pub(crate) fn field_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
#[path = "jira_tests.rs"]
mod tests;
