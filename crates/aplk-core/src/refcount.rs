// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Manual reference counting over [`Value`].

use crate::alloc::Arena;
use crate::heap::TypeCode;
use crate::value::Value;

/// Increment `v`'s refcount if it is heap-resident. Returns `v` unchanged so
/// it can be used inline at the point a second owner takes a reference.
pub fn ref_value(v: Value) -> Value {
    if let Value::Heap(r) = v {
        r.header_mut().refc += 1;
    }
    v
}

/// Decrement `v`'s refcount, freeing it once the count underflows past
/// zero. `Obj`/`Lambda` vectors recursively release their elements first.
pub fn unref(arena: &mut Arena, v: Value) {
    let Value::Heap(r) = v else { return };
    let header = r.header_mut();
    if header.refc > 0 {
        header.refc -= 1;
        return;
    }
    if matches!(r.ty(), TypeCode::Obj | TypeCode::Lambda) {
        for elem in r.slice::<Value>().to_vec() {
            unref(arena, elem);
        }
    }
    arena.free(r);
}

#[cfg(test)]
mod refcount_test;
