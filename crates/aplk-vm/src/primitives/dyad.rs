// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Dyadic (binary) primitive table, indexed by operator position in
//! [`crate::reader::OPS`].

use aplk_core::{Arena, Dict, TypeCode, Value};

use crate::apply::apply;
use crate::error::KError;

pub type Dyad = fn(&mut Arena, &mut Dict, Value, Value) -> Result<Value, KError>;

fn nyi(_arena: &mut Arena, _dict: &mut Dict, _x: Value, _y: Value) -> Result<Value, KError> {
    Err(KError::nyi("binary operator not yet implemented"))
}

/// Elementwise apply of an `Int`-atom-returning closure over `(atom, atom)`,
/// `(atom, vector)`, `(vector, atom)` and `(vector, vector)` shapes; `name`
/// is only used in the rank-mismatch error message.
fn elementwise(
    arena: &mut Arena,
    x: Value,
    y: Value,
    name: &str,
    op: fn(i32, i32) -> i32,
) -> Result<Value, KError> {
    match (x, y) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(op(a, b))),
        (Value::Int(a), Value::Heap(b)) if b.ty() == TypeCode::Int => {
            let out = arena.knew(TypeCode::Int, b.count());
            for (i, bi) in b.slice::<i32>().iter().enumerate() {
                unsafe { out.set_elem(i as i32, op(a, *bi)) };
            }
            Ok(Value::Heap(out))
        }
        (Value::Heap(a), Value::Int(b)) if a.ty() == TypeCode::Int => {
            let out = arena.knew(TypeCode::Int, a.count());
            for (i, ai) in a.slice::<i32>().iter().enumerate() {
                unsafe { out.set_elem(i as i32, op(*ai, b)) };
            }
            Ok(Value::Heap(out))
        }
        (Value::Heap(a), Value::Heap(b)) if a.ty() == TypeCode::Int && b.ty() == TypeCode::Int => {
            if a.count() != b.count() {
                return Err(KError::length(format!(
                    "{name}: mismatched vector lengths {} and {}",
                    a.count(),
                    b.count()
                )));
            }
            let out = arena.knew(TypeCode::Int, a.count());
            for (i, (ai, bi)) in a.slice::<i32>().iter().zip(b.slice::<i32>()).enumerate() {
                unsafe { out.set_elem(i as i32, op(*ai, *bi)) };
            }
            Ok(Value::Heap(out))
        }
        _ => Err(KError::ty(format!("{name}: expected Int operands"))),
    }
}

/// Dyadic `+`.
fn add(arena: &mut Arena, _dict: &mut Dict, x: Value, y: Value) -> Result<Value, KError> {
    elementwise(arena, x, y, "+", |a, b| a.wrapping_add(b))
}

/// Dyadic `*`.
fn mlt(arena: &mut Arena, _dict: &mut Dict, x: Value, y: Value) -> Result<Value, KError> {
    elementwise(arena, x, y, "*", |a, b| a.wrapping_mul(b))
}

/// Dyadic `@` — apply `x` to the single argument `y`.
fn at(arena: &mut Arena, dict: &mut Dict, x: Value, y: Value) -> Result<Value, KError> {
    apply(arena, dict, x, &[y])
}

/// Table of 20 dyadic primitives, aligned with [`crate::reader::OPS`];
/// unpopulated slots raise `Nyi`.
pub const DYAD_TABLE: [Dyad; 20] = [
    nyi, add, nyi, mlt, nyi, at, nyi, nyi, nyi, nyi, nyi, nyi, nyi, nyi, nyi, nyi, nyi, nyi, nyi,
    nyi,
];
