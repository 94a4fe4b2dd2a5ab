// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the bugstat CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] bugstat_core::Error),

    #[error("config file not found: {0}\n  hint: create it or pass --config <path>")]
    ConfigNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{field} is not set\n  hint: add it to the [jira] section of your config")]
    MissingSetting { field: &'static str },

    #[error("invalid duration: {reason}")]
    InvalidDuration { reason: String },

    #[error("invalid UTC offset '{0}'\n  hint: use the form +08:00 or -05:30")]
    InvalidOffset(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bugstat_core::FetchError> for Error {
    fn from(e: bugstat_core::FetchError) -> Self {
        Error::Core(e.into())
    }
}

impl From<bugstat_core::RenderError> for Error {
    fn from(e: bugstat_core::RenderError) -> Self {
        Error::Core(e.into())
    }
}

/// A specialized Result type for bugstat CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
