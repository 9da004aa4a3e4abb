use super::*;
use aplk_core::{Dict, TypeCode};

use crate::bytecode::opcode;

fn consts_of(arena: &mut Arena, values: &[Value]) -> HeapRef {
    let r = arena.knew(TypeCode::Obj, values.len() as i32);
    for (i, v) in values.iter().enumerate() {
        unsafe { r.set_elem(i as i32, *v) };
    }
    r
}

#[test]
fn adds_two_constants() {
    let mut arena = Arena::new();
    let consts = consts_of(&mut arena, &[Value::Int(3), Value::Int(4)]);
    let code = [opcode(OP_CONST, 0), opcode(OP_CONST, 1), opcode(OP_BINARY, 1)];
    let mut dict = Dict::new();
    let mut frame = Frame::top_level(&mut dict);
    let result = run(&mut arena, &code, Some(consts), None, &mut frame).unwrap();
    assert_eq!(result, Value::Int(7));
}

#[test]
fn assignment_binds_and_yields_the_value() {
    let mut arena = Arena::new();
    let consts = consts_of(&mut arena, &[Value::Int(9)]);
    let vars = {
        let r = arena.knew(TypeCode::Sym, 1);
        unsafe { r.set_elem(0, aplk_core::encode_sym(b"x")) };
        r
    };
    let code = [opcode(OP_CONST, 0), opcode(OP_SET_VAR, 0)];
    let mut dict = Dict::new();
    let mut frame = Frame::top_level(&mut dict);
    let result = run(&mut arena, &code, Some(consts), Some(vars), &mut frame).unwrap();
    assert_eq!(result, Value::Int(9));
    let slot = dict.find(aplk_core::encode_sym(b"x")).unwrap();
    assert_eq!(dict.get(slot), Value::Int(9));
}

#[test]
fn undefined_variable_read_is_a_value_error() {
    let mut arena = Arena::new();
    let vars = {
        let r = arena.knew(TypeCode::Sym, 1);
        unsafe { r.set_elem(0, aplk_core::encode_sym(b"y")) };
        r
    };
    let code = [opcode(OP_GET_VAR, 0)];
    let mut dict = Dict::new();
    let mut frame = Frame::top_level(&mut dict);
    let err = run(&mut arena, &code, None, Some(vars), &mut frame).unwrap_err();
    assert_eq!(err.kind, crate::error::KErrorKind::Value);
}

#[test]
fn locals_frame_reads_and_writes_positionally() {
    let mut arena = Arena::new();
    let consts = consts_of(&mut arena, &[Value::Int(1)]);
    let mut locals = [Value::Int(0), Value::nil()];
    let code = [
        opcode(OP_GET_VAR, 0),
        opcode(OP_CONST, 0),
        opcode(OP_BINARY, 1),
        opcode(OP_SET_VAR, 1),
    ];
    let mut dict = Dict::new();
    let mut frame = Frame::call(&mut dict, &mut locals, 2);
    let result = run(&mut arena, &code, Some(consts), None, &mut frame).unwrap();
    assert_eq!(result, Value::Int(1));
    assert_eq!(locals[1], Value::Int(1));
}

#[test]
fn enlist_pops_n_values_in_source_order_and_squeezes() {
    let mut arena = Arena::new();
    let consts = consts_of(&mut arena, &[Value::Int(3), Value::Int(2), Value::Int(1)]);
    // Source `(1;2;3)` emits reversed-segment CONSTs (3,2,1) then enlist 3.
    let code = [
        opcode(OP_CONST, 0),
        opcode(OP_CONST, 1),
        opcode(OP_CONST, 2),
        crate::bytecode::OP_ENLIST,
        3,
    ];
    let mut dict = Dict::new();
    let mut frame = Frame::top_level(&mut dict);
    let result = run(&mut arena, &code, Some(consts), None, &mut frame).unwrap();
    let Value::Heap(r) = result else {
        panic!("expected a heap vector")
    };
    assert_eq!(r.ty(), TypeCode::Int);
    assert_eq!(r.slice::<i32>(), [1, 2, 3]);
}

#[test]
fn a_call_frame_variable_index_at_or_above_varc_resolves_against_the_dict() {
    let mut arena = Arena::new();
    let mut dict = Dict::new();
    let z = aplk_core::encode_sym(b"z");
    let slot = dict.slot(&mut arena, z);
    dict.set(slot, Value::Int(9));

    // Call frame with no genuine locals (varc == 0): any GET_VAR index is a
    // free reference and must resolve against the global dict via `vars`.
    let vars = {
        let r = arena.knew(TypeCode::Sym, 1);
        unsafe { r.set_elem(0, z) };
        r
    };
    let mut locals: [Value; 0] = [];
    let code = [opcode(OP_GET_VAR, 0)];
    let mut frame = Frame::call(&mut dict, &mut locals, 0);
    let result = run(&mut arena, &code, None, Some(vars), &mut frame).unwrap();
    assert_eq!(result, Value::Int(9));
}
