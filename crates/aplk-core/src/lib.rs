// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Value representation, buddy allocator and refcounted heap shared by the
//! tokenizer, compiler and VM.
//!
//! A [`Value`] is either a tagged immediate atom or a reference ([`HeapRef`])
//! to a homogeneously-typed, reference-counted vector carved out of an
//! [`Arena`] by a buddy allocator. [`Dict`] layers a flat symbol table on
//! top for the interpreter's global scope.

mod alloc;
mod dict;
mod heap;
mod ops;
mod refcount;
mod value;

pub use alloc::{Arena, BUCKET_COUNT, MIN_ALLOC};
pub use dict::Dict;
pub use heap::{Header, HeapRef, TypeCode, WIDTHS};
pub use ops::{add_sym, cut_string, encode_sym, join_obj, join_string, join_tagged, squeeze};
pub use refcount::{ref_value, unref};
pub use value::Value;
