// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bugstat - bug statistics reports from Jira.
//!
//! This crate wires [`bugstat_core`] to a Jira server and the command line.
//!
//! # Main Components
//!
//! - [`Config`] - TOML configuration (server, credentials, cache, report output)
//! - [`jira::JiraSource`] - Jira REST implementation of the core issue source
//! - [`output`] - per-run report directory naming
//! - [`details`] - per-issue CSV listings written with each report
//! - [`Error`] - Error types for all operations

mod cli;
mod commands;

pub mod config;
pub mod details;
pub mod duration;
pub mod error;
pub mod jira;
pub mod logging;
pub mod output;

pub use cli::{CacheCommand, Cli, Command, QuerySpec, ReportArgs};
pub use config::Config;
pub use error::{Error, Result};

/// Loads the configuration and runs the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref())?;
    match cli.command {
        Command::Report(args) => commands::report::run(&config, args).await,
        Command::Cache(CacheCommand::List) => commands::cache::list(&config),
        Command::Cache(CacheCommand::Clear) => commands::cache::clear(&config),
    }
}
