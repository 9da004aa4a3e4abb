// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The interpreter's entry point: one source line in, one optional printed
//! value out.

use aplk_core::{unref, Arena, Dict, Value};
use tracing::debug;

use crate::bytecode::{is_class, OP_SET_VAR};
use crate::compiler::compile;
use crate::error::KError;
use crate::reader::{strip, Pools};
use crate::vm::{self, Frame};

/// Owns the global dictionary and heap arena across a REPL/script session.
pub struct Interpreter {
    pub arena: Arena,
    pub dict: Dict,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            dict: Dict::new(),
        }
    }

    /// Evaluate one line of source. Returns `None` for blank/comment-only
    /// lines and for bare assignments (the original's "assignment
    /// suppresses printing" convention); otherwise the expression's value.
    pub fn eval(&mut self, line: &str) -> Result<Option<Value>, KError> {
        let stripped = strip(line);
        if stripped.is_empty() {
            return Ok(None);
        }

        let mut pools = Pools::default();
        let code = compile(&mut self.arena, &mut pools, stripped)?;
        let suppress = code.last().is_some_and(|&b| is_class(OP_SET_VAR, b));

        debug!(bytes = code.len(), suppress, "running compiled unit");
        let mut frame = Frame::top_level(&mut self.dict);
        let result = vm::run(&mut self.arena, &code, pools.consts, pools.vars, &mut frame)?;

        if suppress {
            unref(&mut self.arena, result);
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }
}
