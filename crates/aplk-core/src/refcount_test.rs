use super::*;
use crate::heap::TypeCode;

#[test]
fn ref_on_a_tagged_atom_is_a_no_op() {
    let v = Value::Int(7);
    assert_eq!(ref_value(v), v);
}

#[test]
fn unref_frees_a_single_owner_vector() {
    let mut arena = Arena::new();
    let r = arena.knew(TypeCode::Int, 2);
    let bucket = r.header().bucket;
    unref(&mut arena, Value::Heap(r));
    let reused = arena.knew(TypeCode::Int, 2);
    assert_eq!(reused.header().bucket, bucket);
}

#[test]
fn unref_on_a_shared_vector_only_decrements() {
    let mut arena = Arena::new();
    let r = arena.knew(TypeCode::Int, 2);
    ref_value(Value::Heap(r));
    assert_eq!(r.header().refc, 1);
    unref(&mut arena, Value::Heap(r));
    assert_eq!(r.header().refc, 0);
}

#[test]
fn unref_recurses_into_obj_elements() {
    let mut arena = Arena::new();
    let inner = arena.knew(TypeCode::Int, 1);
    let outer = arena.knew(TypeCode::Obj, 1);
    unsafe { outer.set_elem(0, Value::Heap(inner)) };
    // Should not panic walking into the nested Obj element.
    unref(&mut arena, Value::Heap(outer));
}
