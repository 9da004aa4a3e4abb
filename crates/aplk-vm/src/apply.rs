// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! `apply`/`index`: lambda invocation and vector indexing, with
//! type-specific out-of-bounds fillers for index lookups.

use aplk_core::{ref_value, unref, Arena, Dict, HeapRef, TypeCode, Value};

use crate::error::KError;
use crate::vm::{self, Frame};

/// Apply `f` to `args`. A tagged (non-heap) head cannot be applied at all;
/// a `Lambda` is called with the arguments bound to its parameter locals;
/// anything else is a vector indexed by `args[0]`, with any remaining
/// arguments applied to that result in turn (`m[i;j]` indexes `m` by `i`,
/// then indexes the result by `j`).
pub fn apply(arena: &mut Arena, dict: &mut Dict, f: Value, args: &[Value]) -> Result<Value, KError> {
    let Value::Heap(r) = f else {
        return Err(KError::rank("cannot apply a tagged atom"));
    };
    if r.ty() == TypeCode::Lambda {
        return apply_lambda(arena, dict, r, args);
    }
    let Some((&first, rest)) = args.split_first() else {
        return Err(KError::nyi("apply with no arguments"));
    };
    apply_over(arena, dict, r, first, rest)
}

/// Successive 1-step indexing: index `r` by `first`, then fold each
/// remaining argument through `apply` against the result so far. An
/// intermediate result no longer needed (superseded by the next fold step,
/// or discarded on error) is unrefed here, since nothing else holds it.
fn apply_over(
    arena: &mut Arena,
    dict: &mut Dict,
    r: HeapRef,
    first: Value,
    rest: &[Value],
) -> Result<Value, KError> {
    let mut head = index(arena, r, first)?;
    for &a in rest {
        match apply(arena, dict, head, &[a]) {
            Ok(next) => {
                unref(arena, head);
                head = next;
            }
            Err(e) => {
                unref(arena, head);
                return Err(e);
            }
        }
    }
    Ok(head)
}

fn apply_lambda(
    arena: &mut Arena,
    dict: &mut Dict,
    lambda: HeapRef,
    args: &[Value],
) -> Result<Value, KError> {
    let argc = lambda.header().argc as usize;
    let varc = lambda.header().varc as usize;
    if args.len() != argc {
        return Err(KError::nyi(
            "lambda projection/partial application not supported",
        ));
    }

    let slots = lambda.slice::<Value>();
    let Value::Heap(bytecode) = slots[0] else {
        return Err(KError::ty("corrupt lambda: missing bytecode"));
    };
    let vars = match slots[1] {
        Value::Heap(r) => Some(r),
        _ => None,
    };
    let consts = match slots[2] {
        Value::Heap(r) => Some(r),
        _ => None,
    };

    let mut locals: Vec<Value> = args.iter().map(|&a| ref_value(a)).collect();
    locals.resize(varc, Value::nil());

    let result = {
        let mut frame = Frame::call(dict, &mut locals, varc);
        vm::run(arena, bytecode.slice::<u8>(), consts, vars, &mut frame)
    };

    for v in locals {
        unref(arena, v);
    }
    result
}

/// Index heap vector `r` by `idx`: an `Int` atom indexes a single element,
/// an `Int` vector gathers one element per index. Out-of-bounds indices
/// yield a type-specific filler rather than erroring.
fn index(arena: &mut Arena, r: HeapRef, idx: Value) -> Result<Value, KError> {
    match idx {
        Value::Int(i) => Ok(simple_index(r, i)),
        Value::Heap(iv) if iv.ty() == TypeCode::Int => Ok(vector_index(arena, r, iv)),
        _ => Err(KError::ty("index must be an Int atom or Int vector")),
    }
}

fn simple_index(r: HeapRef, i: i32) -> Value {
    if i < 0 || i >= r.count() {
        return filler(r.ty());
    }
    match r.ty() {
        TypeCode::Obj => ref_value(r.slice::<Value>()[i as usize]),
        TypeCode::Chr => Value::Chr(r.slice::<u8>()[i as usize]),
        TypeCode::Int => Value::Int(r.slice::<i32>()[i as usize]),
        TypeCode::Sym => Value::Sym(r.slice::<u32>()[i as usize]),
        TypeCode::Lambda | TypeCode::Monad => Value::nil(),
    }
}

fn filler(ty: TypeCode) -> Value {
    match ty {
        TypeCode::Chr => Value::Chr(b' '),
        TypeCode::Int => Value::Int(0),
        TypeCode::Sym => Value::Sym(0),
        TypeCode::Obj | TypeCode::Lambda | TypeCode::Monad => Value::nil(),
    }
}

fn vector_index(arena: &mut Arena, r: HeapRef, idxs: HeapRef) -> Value {
    let out = arena.knew(r.ty(), idxs.count());
    for (slot, i) in idxs.slice::<i32>().iter().enumerate() {
        let v = simple_index(r, *i);
        unsafe {
            match r.ty() {
                TypeCode::Chr => {
                    let c = if let Value::Chr(c) = v { c } else { b' ' };
                    out.set_elem(slot as i32, c);
                }
                TypeCode::Int => {
                    let n = if let Value::Int(n) = v { n } else { 0 };
                    out.set_elem(slot as i32, n);
                }
                TypeCode::Sym => {
                    let s = if let Value::Sym(s) = v { s } else { 0u32 };
                    out.set_elem(slot as i32, s);
                }
                // `simple_index` already ref'd `v` for the `Obj` case.
                TypeCode::Obj => out.set_elem(slot as i32, v),
                TypeCode::Lambda | TypeCode::Monad => {}
            }
        }
    }
    Value::Heap(out)
}

#[cfg(test)]
mod apply_test;
