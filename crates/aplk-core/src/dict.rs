// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Global environment: a flat, linearly-scanned symbol-to-value dictionary.

use crate::alloc::Arena;
use crate::heap::{HeapRef, TypeCode};
use crate::ops::{add_sym, join_obj};
use crate::value::Value;

/// Positionally-aligned `(keys: Sym vector, vals: Obj vector)` pair backing
/// the interpreter's single global scope.
#[derive(Default)]
pub struct Dict {
    keys: Option<HeapRef>,
    vals: Option<HeapRef>,
}

impl Dict {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: None,
            vals: None,
        }
    }

    /// Find `key`'s slot, appending a fresh nil-valued entry if it is not
    /// already bound.
    pub fn slot(&mut self, arena: &mut Arena, key: u32) -> usize {
        let index = add_sym(arena, &mut self.keys, key) as usize;
        let vals_count = self.vals.map_or(0, HeapRef::count) as usize;
        if index == vals_count {
            let grown = match self.vals {
                None => {
                    let r = arena.knew(TypeCode::Obj, 1);
                    unsafe { r.set_elem(0, Value::nil()) };
                    r
                }
                Some(v) => join_obj(arena, v, Value::nil()),
            };
            self.vals = Some(grown);
        }
        index
    }

    /// Look up `key` without creating a binding.
    #[must_use]
    pub fn find(&self, key: u32) -> Option<usize> {
        self.keys?.slice::<u32>().iter().position(|&k| k == key)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Value {
        self.vals
            .expect("a slot exists once find()/slot() returns one")
            .slice::<Value>()[index]
    }

    pub fn set(&mut self, index: usize, value: Value) {
        self.vals
            .expect("a slot exists once find()/slot() returns one")
            .slice_mut::<Value>()[index] = value;
    }
}

#[cfg(test)]
mod dict_test;
