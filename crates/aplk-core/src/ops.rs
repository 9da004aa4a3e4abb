// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Vector construction and splicing: join, cut, squeeze, symbol tables.

use core::mem::size_of;

use crate::alloc::{Arena, MIN_ALLOC};
use crate::heap::{Header, HeapRef, TypeCode, WIDTHS};
use crate::refcount::unref;
use crate::value::Value;

/// Pack up to 4 source bytes into a 32-bit symbol identifier. Names longer
/// than 4 bytes are truncated; there is no interning table (see Non-goals).
#[must_use]
pub fn encode_sym(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    let n = bytes.len().min(4);
    buf[..n].copy_from_slice(&bytes[..n]);
    u32::from_le_bytes(buf)
}

/// Grow `x` by `n` elements, reusing the buffer in place when its refcount
/// is zero (sole owner) and the bucket has spare capacity; otherwise
/// reallocates a fresh block and copies the old contents across.
fn extend(arena: &mut Arena, x: HeapRef, n: i32) -> HeapRef {
    let new_count = x.count() + n;
    let ty = x.ty();
    let width = WIDTHS[ty as usize];
    let needed = size_of::<Header>() + new_count as usize * width;
    let bucket_capacity = MIN_ALLOC << (x.header().bucket as usize);
    if x.header().refc != 0 || bucket_capacity < needed {
        let fresh = arena.knew(ty, new_count);
        copy_into(fresh, x, x.count());
        unref(arena, Value::Heap(x));
        fresh
    } else {
        x.header_mut().count = new_count;
        x
    }
}

/// Copy `src`'s first `n` elements into the start of `dst` (same element
/// type), taking a fresh reference to each one when the element type is
/// `Obj` (the elements are themselves owned `Value`s).
fn copy_into(dst: HeapRef, src: HeapRef, n: i32) {
    if src.ty() == TypeCode::Obj {
        for i in 0..n {
            let v: Value = unsafe { src.elem(i) };
            unsafe { dst.set_elem(i, crate::refcount::ref_value(v)) };
        }
    } else {
        unsafe {
            core::ptr::copy_nonoverlapping(
                src.as_ptr(),
                dst.as_ptr(),
                n as usize * WIDTHS[src.ty() as usize],
            );
        }
    }
}

/// Append a raw element `y` to vector `x`, consuming `x`'s ownership and
/// returning the (possibly reused, possibly reallocated) vector.
pub fn join_tagged<T: Copy>(arena: &mut Arena, x: HeapRef, y: T) -> HeapRef {
    let grown = extend(arena, x, 1);
    unsafe { grown.set_elem(grown.count() - 1, y) };
    grown
}

/// Append value `y` to `Obj` vector `x`. Ownership of `y` transfers to the
/// vector; the caller must already hold the reference it intends to give up.
pub fn join_obj(arena: &mut Arena, x: HeapRef, y: Value) -> HeapRef {
    let grown = extend(arena, x, 1);
    unsafe { grown.set_elem(grown.count() - 1, y) };
    grown
}

/// Split a `Chr` vector on delimiter byte `c`, producing an `Obj` of `Chr`
/// sub-vectors. Always produces at least one element (an empty slice cuts
/// into a single empty string). Consumes `x`.
pub fn cut_string(arena: &mut Arena, x: HeapRef, c: u8) -> HeapRef {
    let bytes = x.slice::<u8>();
    let n = 1 + bytes.iter().filter(|&&b| b == c).count();
    let r = arena.knew(TypeCode::Obj, n as i32);
    let mut start = 0usize;
    let mut slot = 0i32;
    for i in 0..=bytes.len() {
        if i == bytes.len() || bytes[i] == c {
            let piece = arena.knew(TypeCode::Chr, (i - start) as i32);
            if i > start {
                unsafe {
                    core::ptr::copy_nonoverlapping(
                        bytes[start..i].as_ptr(),
                        piece.as_ptr(),
                        i - start,
                    );
                }
            }
            unsafe { r.set_elem(slot, Value::Heap(piece)) };
            slot += 1;
            start = i + 1;
        }
    }
    unref(arena, Value::Heap(x));
    r
}

/// Flatten an `Obj` of `Chr` vectors into one `Chr` vector, inserting
/// delimiter byte `c` between elements (`c == 0` means no separator).
/// Consumes `x`.
pub fn join_string(arena: &mut Arena, x: HeapRef, c: u8) -> HeapRef {
    let parts = x.slice::<Value>();
    let sep_count = if c != 0 { parts.len().saturating_sub(1) } else { 0 };
    let body_len: usize = parts
        .iter()
        .map(|v| match v {
            Value::Heap(r) => r.count() as usize,
            _ => 0,
        })
        .sum();
    let r = arena.knew(TypeCode::Chr, (body_len + sep_count) as i32);
    let mut offset = 0usize;
    for (i, part) in parts.iter().enumerate() {
        if let Value::Heap(pr) = part {
            let bytes = pr.slice::<u8>();
            unsafe {
                core::ptr::copy_nonoverlapping(bytes.as_ptr(), r.as_ptr().add(offset), bytes.len());
            }
            offset += bytes.len();
        }
        if c != 0 && i + 1 < parts.len() {
            unsafe { r.set_elem(offset as i32, c) };
            offset += 1;
        }
    }
    unref(arena, Value::Heap(x));
    r
}

/// If every element of `Obj` vector `x` is a tagged atom of the same
/// (non-Sym-mixed) type, return a homogeneous typed vector of the payloads;
/// otherwise return `x` unchanged. Consumes `x` on the conversion path.
#[must_use]
pub fn squeeze(arena: &mut Arena, x: HeapRef) -> HeapRef {
    if x.ty() != TypeCode::Obj || x.count() == 0 {
        return x;
    }
    let elems = x.slice::<Value>();
    let ty = match elems[0] {
        Value::Chr(_) => TypeCode::Chr,
        Value::Int(_) => TypeCode::Int,
        Value::Sym(_) => TypeCode::Sym,
        _ => return x,
    };
    let homogeneous = elems.iter().all(|v| {
        matches!(
            (v, ty),
            (Value::Chr(_), TypeCode::Chr)
                | (Value::Int(_), TypeCode::Int)
                | (Value::Sym(_), TypeCode::Sym)
        )
    });
    if !homogeneous {
        return x;
    }
    let r = arena.knew(ty, x.count());
    for (i, v) in elems.iter().enumerate() {
        match *v {
            Value::Chr(c) => unsafe { r.set_elem(i as i32, c) },
            Value::Int(n) => unsafe { r.set_elem(i as i32, n) },
            Value::Sym(s) => unsafe { r.set_elem(i as i32, s) },
            _ => unreachable!("homogeneity checked above"),
        }
    }
    unref(arena, Value::Heap(x));
    r
}

/// Append `sym` to `*vec` (creating a fresh 1-element `Sym` vector on first
/// use) unless already present; returns its index either way.
pub fn add_sym(arena: &mut Arena, vec: &mut Option<HeapRef>, sym: u32) -> u32 {
    match *vec {
        None => {
            let r = arena.knew(TypeCode::Sym, 1);
            unsafe { r.set_elem(0, sym) };
            *vec = Some(r);
            0
        }
        Some(existing) => {
            if let Some(pos) = existing.slice::<u32>().iter().position(|&s| s == sym) {
                return pos as u32;
            }
            let grown = join_tagged(arena, existing, sym);
            *vec = Some(grown);
            (grown.count() - 1) as u32
        }
    }
}

#[cfg(test)]
mod ops_test;
