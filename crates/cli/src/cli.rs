// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bugstat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bug statistics reports from Jira")]
#[command(
    long_about = "Bug statistics reports from Jira.\n\n\
    Counts the issues matched by a saved filter or JQL query by priority and status, \
    and writes the counts as a CSV table and an SVG pie chart."
)]
pub struct Cli {
    /// Config file (default: ./bugstat.toml if present)
    #[arg(short, long, global = true, value_name = "path", env = "BUGSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a report for a saved filter or a JQL query
    #[command(after_help = "\
Examples:
  bugstat report --filter 12345             Report on a saved filter
  bugstat report --jql 'project = BUG'      Report on a JQL query
  bugstat report --filter 12345 --refresh   Ignore cached results")]
    Report(ReportArgs),

    /// Inspect or clear the issue cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("query").required(true).args(["filter", "jql"])))]
pub struct ReportArgs {
    /// Saved filter id
    #[arg(long, value_name = "id")]
    pub filter: Option<String>,

    /// JQL query
    #[arg(long, value_name = "query")]
    pub jql: Option<String>,

    /// Fetch from the server even if a fresh cached result exists
    #[arg(long)]
    pub refresh: bool,

    /// Directory that receives the per-run report directory
    #[arg(short, long, value_name = "dir")]
    pub output_dir: Option<PathBuf>,
}

/// How a report's issues are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    Filter(String),
    Jql(String),
}

impl ReportArgs {
    pub fn query(&self) -> Option<QuerySpec> {
        match (&self.filter, &self.jql) {
            (Some(id), _) => Some(QuerySpec::Filter(id.clone())),
            (None, Some(jql)) => Some(QuerySpec::Jql(jql.clone())),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cached queries, oldest first
    List,
    /// Remove every cached query
    Clear,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
