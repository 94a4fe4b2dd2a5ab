// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::{Path, PathBuf};

use bugstat_core::render::table;
use bugstat_core::{
    Aggregator, ClockSource, IssueCache, IssueFetcher, Pipeline, QueryKey, RemoteRequest, Report,
    ReportRenderer, RunRequest,
};
use tracing::{info, warn};

use super::open_store;
use crate::cli::{QuerySpec, ReportArgs};
use crate::config::Config;
use crate::details;
use crate::error::{Error, Result};
use crate::jira::JiraSource;
use crate::output::{create_run_dir, run_dir_name, target_from_jql};

pub async fn run(config: &Config, args: ReportArgs) -> Result<()> {
    config.require_jira()?;
    let query = args
        .query()
        .ok_or_else(|| Error::Config("either --filter or --jql is required".to_string()))?;
    let password = config.password().unwrap_or_default();
    let source = JiraSource::new(&config.jira, password, config.fetch.request_timeout)?;

    let jql = match query {
        QuerySpec::Filter(id) => {
            let jql = config
                .fetch_policy()
                .run(RemoteRequest::Filter, || source.resolve_filter(&id))
                .await?;
            info!(filter = %id, jql = %jql, "resolved saved filter");
            jql
        }
        QuerySpec::Jql(jql) => jql,
    };
    let key = QueryKey::new(source.server(), &jql, config.jira.page_size);

    let pipeline = Pipeline::new(
        IssueFetcher::new(source, config.fetch_policy()),
        IssueCache::new(open_store(config)?, config.cache.retention),
        Aggregator::new(config.classifier()),
        ReportRenderer::new(config.report.empty_chart),
    );
    let request = RunRequest::new(key, config.cache.freshness).force_refresh(args.refresh);
    let issues = pipeline.collect(&request).await?;

    let base = args.output_dir.unwrap_or_else(|| config.report.output_dir.clone());
    let started = pipeline.cache().clock().now_utc();
    let name = run_dir_name(&target_from_jql(&jql), started, config.report.utc_offset);
    let dir = create_run_dir(&base, &name)?;

    let report = match pipeline.report(&issues, &dir) {
        Ok(report) => report,
        Err(e) => {
            discard_run_dir(&dir);
            return Err(e.into());
        }
    };

    let listings = if config.report.details {
        let listings = details::listings(
            &issues,
            &config.classifier(),
            config.jira.technology_field.as_deref(),
            config.report.utc_offset,
        );
        match details::write_all(&listings, &dir) {
            Ok(paths) => paths,
            Err(e) => {
                discard_run_dir(&dir);
                return Err(e.into());
            }
        }
    } else {
        Vec::new()
    };

    print_summary(&report, &listings);
    Ok(())
}

fn discard_run_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!(path = %dir.display(), "failed to remove run directory: {}", e);
    }
}

fn print_summary(report: &Report, listings: &[PathBuf]) {
    print!("{}", table::to_text(&report.matrix));
    println!();
    println!("Table written to {}", report.table_artifact_path.display());
    match &report.chart_artifact_path {
        Some(path) => println!("Chart written to {}", path.display()),
        None => println!("No chart written (no issues matched)"),
    }
    for path in listings {
        println!("Issues listed in {}", path.display());
    }
}
