// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor `--verbose` is given.
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. `verbose` forces debug output for the
/// bugstat crates; otherwise `RUST_LOG` applies, defaulting to warnings.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,bugstat_core=debug,bugstat_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
