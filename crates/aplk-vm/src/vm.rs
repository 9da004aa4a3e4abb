// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The stack-based bytecode dispatch loop.

use aplk_core::{ref_value, squeeze, unref, Arena, Dict, HeapRef, TypeCode, Value};
use tracing::trace;

use crate::bytecode::{
    class_of, index_of, OP_BINARY, OP_CONST, OP_DISCARD, OP_ENLIST, OP_GET_VAR, OP_N_ARY,
    OP_SET_VAR, OP_SPECIAL, OP_UNARY,
};
use crate::error::KError;
use crate::primitives::{DYAD_TABLE, MONAD_TABLE};

/// Fixed value-stack capacity, matching the original's 64-slot stack.
pub const STACK_SIZE: usize = 64;

/// Where `OP_GET_VAR`/`OP_SET_VAR` read and write.
///
/// A variable index below `varc` is a lambda-local slot (parameters, then
/// any name first bound by an assignment in the body); an index at or above
/// `varc` is a free reference resolved against the interpreter's global
/// [`Dict`] instead. Top-level code runs with `varc == 0` and no locals, so
/// every lookup goes straight to `dict`. Reading an unbound global is a
/// value error; assigning one creates it.
pub struct Frame<'a> {
    pub dict: &'a mut Dict,
    pub locals: Option<&'a mut [Value]>,
    pub varc: usize,
}

impl<'a> Frame<'a> {
    pub fn top_level(dict: &'a mut Dict) -> Self {
        Self {
            dict,
            locals: None,
            varc: 0,
        }
    }

    pub fn call(dict: &'a mut Dict, locals: &'a mut [Value], varc: usize) -> Self {
        Self {
            dict,
            locals: Some(locals),
            varc,
        }
    }
}

/// Run one compiled unit (top-level line or lambda body) to completion,
/// returning the value left on top of the stack.
pub fn run(
    arena: &mut Arena,
    code: &[u8],
    consts: Option<HeapRef>,
    vars: Option<HeapRef>,
    frame: &mut Frame,
) -> Result<Value, KError> {
    let mut stack: Vec<Value> = Vec::with_capacity(STACK_SIZE);
    let mut ip = 0usize;

    macro_rules! bail {
        ($e:expr) => {{
            for v in stack.drain(..) {
                unref(arena, v);
            }
            return Err($e);
        }};
    }

    while ip < code.len() {
        let byte = code[ip];
        ip += 1;
        let index = index_of(byte) as usize;
        trace!(ip, byte, "vm dispatch");

        match class_of(byte) {
            OP_CONST => {
                let Some(pool) = consts else {
                    bail!(KError::value("no constant pool"))
                };
                if index >= pool.count() as usize {
                    bail!(KError::value("constant index out of range"))
                }
                let v = pool.slice::<Value>()[index];
                stack.push(ref_value(v));
            }
            OP_GET_VAR => {
                let is_local = index < frame.varc;
                if is_local {
                    let locals = frame
                        .locals
                        .as_deref()
                        .expect("varc > 0 implies a call frame");
                    stack.push(ref_value(locals[index]));
                } else {
                    let Some(pool) = vars else {
                        bail!(KError::value("no variable pool"))
                    };
                    let sym = pool.slice::<u32>()[index];
                    let Some(slot) = frame.dict.find(sym) else {
                        bail!(KError::value("undefined variable"))
                    };
                    stack.push(ref_value(frame.dict.get(slot)));
                }
            }
            OP_SET_VAR => {
                let Some(v) = stack.pop() else {
                    bail!(KError::value("stack underflow in assignment"))
                };
                let is_local = index < frame.varc;
                if is_local {
                    let locals = frame
                        .locals
                        .as_deref_mut()
                        .expect("varc > 0 implies a call frame");
                    unref(arena, locals[index]);
                    locals[index] = v;
                } else {
                    let Some(pool) = vars else {
                        bail!(KError::value("no variable pool"))
                    };
                    let sym = pool.slice::<u32>()[index];
                    let slot = frame.dict.slot(arena, sym);
                    unref(arena, frame.dict.get(slot));
                    frame.dict.set(slot, v);
                }
                stack.push(ref_value(v));
            }
            OP_UNARY => {
                let Some(x) = stack.pop() else {
                    bail!(KError::value("stack underflow in unary op"))
                };
                match MONAD_TABLE[index](arena, frame.dict, x) {
                    Ok(result) => {
                        unref(arena, x);
                        stack.push(result);
                    }
                    Err(e) => {
                        unref(arena, x);
                        bail!(e)
                    }
                }
            }
            OP_BINARY => {
                let (Some(y), Some(x)) = (stack.pop(), stack.pop()) else {
                    bail!(KError::value("stack underflow in binary op"))
                };
                match DYAD_TABLE[index](arena, frame.dict, x, y) {
                    Ok(result) => {
                        unref(arena, x);
                        unref(arena, y);
                        stack.push(result);
                    }
                    Err(e) => {
                        unref(arena, x);
                        unref(arena, y);
                        bail!(e)
                    }
                }
            }
            OP_N_ARY => {
                if index == 0 {
                    // statement separator
                    if let Some(v) = stack.pop() {
                        unref(arena, v);
                    }
                } else {
                    if stack.len() < index + 1 {
                        bail!(KError::value("stack underflow in application"))
                    }
                    let args: Vec<Value> = stack.split_off(stack.len() - index);
                    let Some(f) = stack.pop() else {
                        bail!(KError::value("stack underflow in application"))
                    };
                    match crate::apply::apply(arena, frame.dict, f, &args) {
                        Ok(result) => {
                            unref(arena, f);
                            for a in &args {
                                unref(arena, *a);
                            }
                            stack.push(result);
                        }
                        Err(e) => {
                            unref(arena, f);
                            for a in &args {
                                unref(arena, *a);
                            }
                            bail!(e)
                        }
                    }
                }
            }
            OP_SPECIAL => {
                if byte == OP_ENLIST {
                    let Some(&n) = code.get(ip) else {
                        bail!(KError::value("enlist: missing count byte"))
                    };
                    ip += 1;
                    let n = n as usize;
                    if stack.len() < n {
                        bail!(KError::value("stack underflow in enlist"))
                    }
                    let popped: Vec<Value> = stack.split_off(stack.len() - n);
                    let obj = arena.knew(TypeCode::Obj, n as i32);
                    for (slot, v) in popped.into_iter().rev().enumerate() {
                        unsafe { obj.set_elem(slot as i32, v) };
                    }
                    stack.push(Value::Heap(squeeze(arena, obj)));
                } else if byte == OP_DISCARD {
                    let Some(v) = stack.pop() else {
                        bail!(KError::value("stack underflow in discard"))
                    };
                    unref(arena, v);
                } else {
                    bail!(KError::nyi("special form not yet implemented"))
                }
            }
            _ => bail!(KError::value("invalid opcode")),
        }
    }

    stack.pop().ok_or_else(|| KError::value("no value produced"))
}

#[cfg(test)]
mod vm_test;
