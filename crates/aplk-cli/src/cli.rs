// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Command-line argument surface.

use std::path::PathBuf;

use clap::Parser;

/// Run a script file, or drop into an interactive REPL when none is given.
#[derive(Parser, Debug)]
#[command(name = "aplk", version, about = "A K/APL-style array language interpreter")]
pub struct Cli {
    /// Script to run; omit to start an interactive session.
    pub script: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv); overridden by `RUST_LOG` if set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the startup banner in interactive mode.
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
