// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    unreachable = { FetchError::Unreachable("connection refused".into()), true },
    timeout = { FetchError::Timeout { request: RemoteRequest::Page(2), after: Duration::from_secs(1) }, true },
    too_many_requests = { FetchError::Status { code: 429, message: "slow down".into() }, true },
    server_error = { FetchError::Status { code: 503, message: "unavailable".into() }, true },
    not_found = { FetchError::Status { code: 404, message: "no such filter".into() }, false },
    unauthorized = { FetchError::Unauthorized("bad credentials".into()), false },
    decode = { FetchError::Decode("expected array".into()), false },
)]
fn fetch_error_retryable(err: FetchError, expected: bool) {
    assert_eq!(err.is_retryable(), expected);
}

#[test]
fn retries_exhausted_is_not_retried_again() {
    let err = FetchError::RetriesExhausted {
        request: RemoteRequest::Page(1),
        attempts: 3,
        source: Box::new(FetchError::Unreachable("down".into())),
    };
    assert!(!err.is_retryable());
    let msg = err.to_string();
    assert!(msg.contains("page 1"));
    assert!(msg.contains("3 attempts"));
    assert!(msg.contains("down"));
}

#[test]
fn filter_timeout_names_the_filter_lookup() {
    let err = FetchError::Timeout { request: RemoteRequest::Filter, after: Duration::from_millis(200) };
    assert_eq!(err.to_string(), "filter lookup timed out after 200ms");
}

#[test]
fn incomplete_reports_partial_count() {
    let err = FetchError::Incomplete {
        partial: vec![Issue::new("BUG-1"), Issue::new("BUG-2")],
        source: Box::new(FetchError::Unreachable("reset".into())),
    };
    assert!(err.to_string().contains("after 2 issues"));
}

#[parameterized(
    key_mismatch = { CacheCorruption::KeyMismatch { fingerprint: "abc".into() }, "abc" },
    negative_age = { CacheCorruption::NegativeAge { fetched_at_ms: 20, now_ms: 10 }, "newer than the clock" },
    malformed = { CacheCorruption::Malformed { fingerprint: "abc".into(), reason: "bad json".into() }, "bad json" },
)]
fn cache_corruption_display(err: CacheCorruption, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn render_error_display_names_path() {
    let err = RenderError::ArtifactExists { path: PathBuf::from("/tmp/out/table.csv") };
    let msg = err.to_string();
    assert!(msg.contains("/tmp/out/table.csv"));
    assert!(msg.contains("hint"));
}

#[test]
fn fetch_error_is_transparent_in_error() {
    let err: Error = FetchError::Unauthorized("401".into()).into();
    assert!(matches!(err, Error::Fetch(FetchError::Unauthorized(_))));
    assert!(err.to_string().starts_with("authentication rejected"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
