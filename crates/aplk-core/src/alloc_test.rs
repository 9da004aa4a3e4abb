use super::*;

#[test]
fn knew_then_free_reuses_the_same_bucket() {
    let mut arena = Arena::new();
    let a = arena.knew(TypeCode::Int, 1);
    let bucket = a.header().bucket;
    arena.free(a);
    let b = arena.knew(TypeCode::Int, 1);
    assert_eq!(b.header().bucket, bucket);
}

#[test]
fn knew_zeroes_refcount_and_sets_type_and_count() {
    let mut arena = Arena::new();
    let r = arena.knew(TypeCode::Chr, 5);
    assert_eq!(r.ty(), TypeCode::Chr);
    assert_eq!(r.count(), 5);
    assert_eq!(r.header().refc, 0);
}

#[test]
fn bucket_for_rounds_up_to_the_next_power_of_two() {
    assert_eq!(Arena::bucket_for(1), 0);
    assert_eq!(Arena::bucket_for(MIN_ALLOC), 0);
    assert_eq!(Arena::bucket_for(MIN_ALLOC + 1), 1);
    assert_eq!(Arena::bucket_for(MIN_ALLOC * 2), 1);
}

#[test]
fn large_allocation_splits_a_bigger_bucket() {
    let mut arena = Arena::new();
    // Force a grow + split by requesting a mid-size vector with nothing freed yet.
    let r = arena.knew(TypeCode::Int, 100);
    assert_eq!(r.count(), 100);
}

#[test]
fn distinct_allocations_do_not_alias() {
    let mut arena = Arena::new();
    let a = arena.knew(TypeCode::Int, 4);
    let b = arena.knew(TypeCode::Int, 4);
    unsafe {
        a.set_elem(0, 11i32);
        b.set_elem(0, 22i32);
    }
    assert_eq!(unsafe { a.elem::<i32>(0) }, 11);
    assert_eq!(unsafe { b.elem::<i32>(0) }, 22);
}
