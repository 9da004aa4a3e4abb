// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Monadic (unary) primitive table, indexed by operator position in
//! [`crate::reader::OPS`].

use std::fs;

use aplk_core::{Arena, Dict, TypeCode, Value};

use crate::error::KError;

pub type Monad = fn(&mut Arena, &mut Dict, Value) -> Result<Value, KError>;

fn nyi(_arena: &mut Arena, _dict: &mut Dict, _x: Value) -> Result<Value, KError> {
    Err(KError::nyi("unary operator not yet implemented"))
}

/// Monadic `.` — read a file named by a `Chr` vector argument and return
/// its contents as a fresh `Chr` vector.
fn value(arena: &mut Arena, _dict: &mut Dict, x: Value) -> Result<Value, KError> {
    let Value::Heap(r) = x else {
        return Err(KError::ty("expected a Chr vector file name"));
    };
    if r.ty() != TypeCode::Chr {
        return Err(KError::ty("expected a Chr vector file name"));
    }
    let path = String::from_utf8_lossy(r.slice::<u8>()).into_owned();
    let contents =
        fs::read(&path).map_err(|e| KError::value(format!("cannot read '{path}': {e}")))?;
    let out = arena.knew(TypeCode::Chr, contents.len() as i32);
    if !contents.is_empty() {
        unsafe { core::ptr::copy_nonoverlapping(contents.as_ptr(), out.as_ptr(), contents.len()) };
    }
    Ok(Value::Heap(out))
}

/// Monadic `#` — element count; atoms (including lambdas) count as 1.
fn count(_arena: &mut Arena, _dict: &mut Dict, x: Value) -> Result<Value, KError> {
    match x {
        Value::Heap(r) if r.ty() != TypeCode::Lambda => Ok(Value::Int(r.count())),
        _ => Ok(Value::Int(1)),
    }
}

/// Table of 20 monadic primitives, aligned with [`crate::reader::OPS`];
/// unpopulated slots raise `Nyi`.
pub const MONAD_TABLE: [Monad; 20] = [
    nyi, nyi, nyi, nyi, nyi, nyi, value, nyi, nyi, nyi, nyi, nyi, count, nyi, nyi, nyi, nyi, nyi,
    nyi, nyi,
];

#[cfg(test)]
mod monad_test {
    use super::*;

    #[test]
    fn count_of_an_atom_is_one() {
        let mut arena = Arena::new();
        let mut dict = Dict::new();
        assert_eq!(count(&mut arena, &mut dict, Value::Int(5)).unwrap(), Value::Int(1));
    }

    #[test]
    fn count_of_a_vector_is_its_length() {
        let mut arena = Arena::new();
        let mut dict = Dict::new();
        let r = arena.knew(TypeCode::Int, 3);
        assert_eq!(
            count(&mut arena, &mut dict, Value::Heap(r)).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn unpopulated_slots_are_not_yet_implemented() {
        let mut arena = Arena::new();
        let mut dict = Dict::new();
        let err = MONAD_TABLE[0](&mut arena, &mut dict, Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, crate::error::KErrorKind::Nyi);
    }
}
