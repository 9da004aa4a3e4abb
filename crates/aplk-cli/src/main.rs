// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! `aplk`: run a script file, or start an interactive REPL when none is
//! given.

mod cli;
mod repl;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use aplk_vm::Interpreter;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match &cli.script {
        Some(path) => run_script(path),
        None => repl::run(!cli.no_banner),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_script(path: &std::path::Path) -> Result<()> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut interp = Interpreter::new();

    for line in source.lines() {
        if line.trim() == "\\" {
            break;
        }
        match interp.eval(line) {
            Ok(Some(value)) => println!("{}", aplk_vm::print(value)),
            Ok(None) => {}
            Err(e) => anyhow::bail!("{}", e.render(line)),
        }
    }
    Ok(())
}
