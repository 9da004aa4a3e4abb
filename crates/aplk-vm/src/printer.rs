// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Rendering a [`Value`] back to K/APL-style source text.

use aplk_core::{TypeCode, Value};

/// Render `v` the way a REPL echoes a result: atoms print bare, a
/// single-element vector gets a leading `,` (the "this was a list, not an
/// atom" marker), and empty vectors spell their type (`()`, `""`, `0#0`).
#[must_use]
pub fn print(v: Value) -> String {
    match v {
        Value::Nil => "()".to_string(),
        Value::Chr(c) => format!("\"{}\"", c as char),
        Value::Int(n) => n.to_string(),
        Value::Sym(s) => format!("`{}", decode_sym(s)),
        Value::Heap(r) => print_heap(r),
    }
}

fn decode_sym(s: u32) -> String {
    s.to_be_bytes()
        .into_iter()
        .take_while(|&b| b != 0)
        .map(|b| b as char)
        .collect()
}

fn print_heap(r: aplk_core::HeapRef) -> String {
    let count = r.count();
    match r.ty() {
        TypeCode::Chr => {
            let s: String = r.slice::<u8>().iter().map(|&b| b as char).collect();
            format!("\"{s}\"")
        }
        TypeCode::Int => print_elems(count, || {
            r.slice::<i32>().iter().map(i32::to_string).collect()
        }),
        TypeCode::Sym => print_elems(count, || {
            r.slice::<u32>()
                .iter()
                .map(|&s| format!("`{}", decode_sym(s)))
                .collect()
        }),
        TypeCode::Obj => {
            if count == 0 {
                return "()".to_string();
            }
            let parts: Vec<String> = r.slice::<Value>().iter().map(|&v| print(v)).collect();
            if parts.len() == 1 {
                format!(",{}", parts[0])
            } else {
                format!("({})", parts.join(";"))
            }
        }
        TypeCode::Lambda => print_lambda_source(r),
        TypeCode::Monad => "<primitive>".to_string(),
    }
}

fn print_elems(count: i32, render: impl Fn() -> Vec<String>) -> String {
    if count == 0 {
        return "0#0".to_string();
    }
    let parts = render();
    if parts.len() == 1 {
        format!(",{}", parts[0])
    } else {
        parts.join(" ")
    }
}

/// A `Lambda` prints the source text it was compiled from rather than its
/// bytecode.
fn print_lambda_source(r: aplk_core::HeapRef) -> String {
    let slots = r.slice::<Value>();
    match slots.get(3) {
        Some(Value::Heap(src)) if src.ty() == TypeCode::Chr => {
            src.slice::<u8>().iter().map(|&b| b as char).collect()
        }
        _ => "{}".to_string(),
    }
}

#[cfg(test)]
mod printer_test {
    use super::*;
    use aplk_core::{Arena, TypeCode};

    #[test]
    fn int_atom_prints_bare() {
        assert_eq!(print(Value::Int(42)), "42");
    }

    #[test]
    fn chr_atom_prints_quoted() {
        assert_eq!(print(Value::Chr(b'x')), "\"x\"");
    }

    #[test]
    fn nil_prints_as_empty_parens() {
        assert_eq!(print(Value::nil()), "()");
    }

    #[test]
    fn empty_int_vector_prints_zero_hash_zero() {
        let mut arena = Arena::new();
        let r = arena.knew(TypeCode::Int, 0);
        assert_eq!(print(Value::Heap(r)), "0#0");
    }

    #[test]
    fn single_element_int_vector_gets_comma_prefix() {
        let mut arena = Arena::new();
        let r = arena.knew(TypeCode::Int, 1);
        unsafe { r.set_elem(0, 7i32) };
        assert_eq!(print(Value::Heap(r)), ",7");
    }

    #[test]
    fn multi_element_int_vector_is_space_separated() {
        let mut arena = Arena::new();
        let r = arena.knew(TypeCode::Int, 3);
        for i in 0..3 {
            unsafe { r.set_elem(i, (i + 1) as i32) };
        }
        assert_eq!(print(Value::Heap(r)), "1 2 3");
    }

    #[test]
    fn chr_vector_prints_as_a_quoted_string() {
        let mut arena = Arena::new();
        let r = arena.knew(TypeCode::Chr, 3);
        for (i, b) in b"cat".iter().enumerate() {
            unsafe { r.set_elem(i as i32, *b) };
        }
        assert_eq!(print(Value::Heap(r)), "\"cat\"");
    }

    #[test]
    fn lambda_prints_its_stored_source() {
        let mut arena = Arena::new();
        let src = arena.knew(TypeCode::Chr, 5);
        for (i, b) in b"{x+1}".iter().enumerate() {
            unsafe { src.set_elem(i as i32, *b) };
        }
        let lambda = arena.knew(TypeCode::Lambda, 4);
        unsafe {
            lambda.set_elem(0, Value::nil());
            lambda.set_elem(1, Value::nil());
            lambda.set_elem(2, Value::nil());
            lambda.set_elem(3, Value::Heap(src));
        }
        assert_eq!(print(Value::Heap(lambda)), "{x+1}");
    }
}
