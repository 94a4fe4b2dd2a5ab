// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn bugstat() -> Command {
    let mut cmd = cargo_bin_cmd!("bugstat");
    cmd.env_remove("BUGSTAT_CONFIG")
        .env_remove("BUGSTAT_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a config pointing at `server`, with the cache and reports kept
/// inside `temp`. `extra` is appended verbatim.
pub fn write_config(temp: &TempDir, server: &str, extra: &str) -> PathBuf {
    let path = temp.path().join("bugstat.toml");
    let content = format!(
        r#"[jira]
server = "{server}"
username = "reporter"
password = "secret"
page_size = 2

[fetch]
max_attempts = 1
request_timeout = "5s"

[cache]
path = "{cache}"

[report]
output_dir = "{reports}"
utc_offset = "+00:00"
{extra}"#,
        cache = toml_path(&temp.path().join("cache.db")),
        reports = toml_path(&temp.path().join("Report")),
    );
    std::fs::write(&path, content).unwrap();
    path
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

/// Run directories created under `<temp>/Report`.
pub fn run_dirs(temp: &TempDir) -> Vec<PathBuf> {
    let base = temp.path().join("Report");
    if !base.exists() {
        return Vec::new();
    }
    let mut dirs: Vec<PathBuf> =
        std::fs::read_dir(base).unwrap().map(|e| e.unwrap().path()).collect();
    dirs.sort();
    dirs
}

/// Minimal Jira stand-in answering filter and search requests.
pub struct StubJira {
    pub url: String,
    pub searches: Arc<AtomicUsize>,
}

/// A canned issue: key, priority label, status label.
pub type StubIssue = (&'static str, &'static str, &'static str);

impl StubJira {
    /// Serves `jql` for every saved filter and `issues` from `/search`,
    /// paged according to `startAt` and `maxResults`.
    pub fn start(jql: &'static str, issues: &'static [StubIssue]) -> Self {
        Self::start_with(move |path| respond(path, jql, issues))
    }

    /// Answers every request with `status` and `body`.
    pub fn failing(status: u16, body: &'static str) -> Self {
        Self::start_with(move |_| (status, body.to_string()))
    }

    /// Accepts connections and never answers them.
    pub fn silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming() {
                held.extend(stream.ok());
            }
        });
        StubJira { url, searches: Arc::new(AtomicUsize::new(0)) }
    }

    fn start_with<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let searches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&searches);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Some(path) = read_request_path(&mut stream) else { continue };
                if path.starts_with("/rest/api/2/search") {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                let (status, body) = handler(&path);
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        StubJira { url, searches }
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

fn read_request_path(stream: &mut std::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines().next()?.split_whitespace().nth(1).map(str::to_string)
}

fn query_param(path: &str, name: &str) -> Option<usize> {
    let query = path.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| v.parse().ok())
}

fn respond(path: &str, jql: &str, issues: &[StubIssue]) -> (u16, String) {
    if path.starts_with("/rest/api/2/filter/") {
        return (200, serde_json::json!({ "jql": jql }).to_string());
    }
    if path.starts_with("/rest/api/2/search") {
        let start = query_param(path, "startAt").unwrap_or(0);
        let max = query_param(path, "maxResults").unwrap_or(50);
        let page: Vec<serde_json::Value> = issues
            .iter()
            .skip(start)
            .take(max)
            .map(|(key, priority, status)| {
                serde_json::json!({
                    "id": key.replace("BUG-", "100"),
                    "key": key,
                    "fields": {
                        "priority": { "name": priority },
                        "status": { "name": status },
                        "summary": format!("{key} summary"),
                        "reporter": { "displayName": "Ada Reporter" },
                        "assignee": { "displayName": "Bo Assignee" },
                        "created": "2026-02-27T10:15:30.000+0000"
                    }
                })
            })
            .collect();
        let body = serde_json::json!({
            "startAt": start,
            "maxResults": max,
            "total": issues.len(),
            "issues": page
        });
        return (200, body.to_string());
    }
    (404, "{}".to_string())
}
