// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Converts a stripped source line into a flat token stream, resolving
//! constants and variable references into sidecar pool indices as it goes.

use aplk_core::{Arena, HeapRef, TypeCode, Value};

use crate::compiler::compile_lambda;
use crate::error::KError;

/// Recognized operator characters; a token's operator index is its
/// position in this table.
pub const OPS: &[u8; 20] = b":+-*%@.!,<>?#_~&|=$^";

/// A lexical token with constants/variables already resolved to pool slots.
#[derive(Clone, Copy, Debug)]
pub enum Token {
    /// Index into [`OPS`].
    Op(u8),
    /// Index into the compiled unit's constant pool.
    Const(u8),
    /// Index into the compiled unit's variable pool.
    Var(u8),
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// Statement separator.
    Semi,
}

/// Sidecar constant/variable pools threaded through tokenization and
/// compilation of one compiled unit (a top-level line, or a lambda body).
#[derive(Default)]
pub struct Pools {
    pub consts: Option<HeapRef>,
    pub vars: Option<HeapRef>,
}

impl Pools {
    pub(crate) fn add_const(&mut self, arena: &mut Arena, value: Value) -> u8 {
        match self.consts {
            None => {
                let r = arena.knew(TypeCode::Obj, 1);
                unsafe { r.set_elem(0, value) };
                self.consts = Some(r);
                0
            }
            Some(existing) => {
                let grown = aplk_core::join_obj(arena, existing, value);
                self.consts = Some(grown);
                (grown.count() - 1) as u8
            }
        }
    }

    pub(crate) fn add_var(&mut self, arena: &mut Arena, sym: u32) -> u8 {
        aplk_core::add_sym(arena, &mut self.vars, sym) as u8
    }
}

/// Tokenize `src` into a flat [`Token`] stream. `src` must already have
/// trailing comments stripped (see [`crate::reader::strip`]).
pub fn tokenize(arena: &mut Arena, pools: &mut Pools, src: &str) -> Result<Vec<Token>, KError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' => i += 1,
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            b']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            b';' => {
                tokens.push(Token::Semi);
                i += 1;
            }
            b'"' => {
                let (value, next) = lex_string(arena, bytes, i)?;
                let idx = pools.add_const(arena, value);
                tokens.push(Token::Const(idx));
                i = next;
            }
            b'`' => {
                let (name, next) = lex_name(bytes, i + 1);
                let idx = pools.add_const(arena, Value::Sym(aplk_core::encode_sym(name)));
                tokens.push(Token::Const(idx));
                i = next;
            }
            b'{' => {
                let (lambda, next) = compile_lambda(arena, bytes, i)?;
                let idx = pools.add_const(arena, lambda);
                tokens.push(Token::Const(idx));
                i = next;
            }
            b'0'..=b'9' => {
                let (value, next) = lex_number(arena, bytes, i);
                let idx = pools.add_const(arena, value);
                tokens.push(Token::Const(idx));
                i = next;
            }
            b'a'..=b'z' | b'A'..=b'Z' => {
                let (name, next) = lex_name(bytes, i);
                let idx = pools.add_var(arena, aplk_core::encode_sym(name));
                tokens.push(Token::Var(idx));
                i = next;
            }
            _ => {
                if let Some(pos) = OPS.iter().position(|&op| op == c) {
                    tokens.push(Token::Op(pos as u8));
                    i += 1;
                } else {
                    return Err(KError::parse(
                        format!("invalid character '{}'", c as char),
                        i,
                    ));
                }
            }
        }
    }
    Ok(tokens)
}

fn lex_name(bytes: &[u8], start: usize) -> (&[u8], usize) {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    (&bytes[start..end], end)
}

/// Parses a run of space-separated digit groups into an `Int` atom (a
/// single group) or an `Int` vector constant (multiple groups).
fn lex_number(arena: &mut Arena, bytes: &[u8], start: usize) -> (Value, usize) {
    let mut values = Vec::new();
    let mut i = start;
    loop {
        let group_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let n: i32 = std::str::from_utf8(&bytes[group_start..i])
            .expect("ascii digits are valid utf8")
            .parse()
            .unwrap_or(i32::MAX);
        values.push(n);
        if i < bytes.len() && bytes[i] == b' ' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
            i += 1;
        } else {
            break;
        }
    }
    if values.len() == 1 {
        (Value::Int(values[0]), i)
    } else {
        let r = arena.knew(TypeCode::Int, values.len() as i32);
        for (idx, v) in values.iter().enumerate() {
            unsafe { r.set_elem(idx as i32, *v) };
        }
        (Value::Heap(r), i)
    }
}

fn lex_string(arena: &mut Arena, bytes: &[u8], start: usize) -> Result<(Value, usize), KError> {
    let mut i = start + 1;
    let body_start = i;
    while i < bytes.len() && bytes[i] != b'"' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(KError::parse("unclosed string", start));
    }
    let body = &bytes[body_start..i];
    if body.is_empty() {
        return Err(KError::parse("empty string literal", start));
    }
    let r = arena.knew(TypeCode::Chr, body.len() as i32);
    unsafe {
        core::ptr::copy_nonoverlapping(body.as_ptr(), r.as_ptr(), body.len());
    }
    Ok((Value::Heap(r), i + 1))
}

#[cfg(test)]
mod lexer_test;
