// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use bugstat_cli::{logging, Cli};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(e) = bugstat_cli::run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
