// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Interactive line-editing session.

use anyhow::Result;
use aplk_vm::{print, Interpreter};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

const HISTORY_FILE: &str = ".aplk_history";
const PROMPT: &str = "  ";

/// Run an interactive session until EOF, `Ctrl-C`, or a `\` exit line.
pub fn run(banner: bool) -> Result<()> {
    if banner {
        println!("aplk {}", env!("CARGO_PKG_VERSION"));
    }

    let mut editor = DefaultEditor::new()?;
    if editor.load_history(HISTORY_FILE).is_err() {
        // No prior history; start fresh.
    }

    let mut interp = Interpreter::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                if line.trim() == "\\" {
                    break;
                }
                match interp.eval(&line) {
                    Ok(Some(value)) => println!("{}", print(value)),
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e.render(&line)),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                warn!(error = %e, "readline error");
                break;
            }
        }
    }

    if let Err(e) = editor.save_history(HISTORY_FILE) {
        warn!(error = %e, "failed to save history");
    }
    Ok(())
}
