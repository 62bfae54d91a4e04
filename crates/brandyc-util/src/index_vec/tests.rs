use super::*;
use crate::define_idx;

define_idx!(TestId);

#[test]
fn test_push_returns_sequential_indices() {
    let mut v: IndexVec<TestId, i32> = IndexVec::new();
    let a = v.push(10);
    let b = v.push(20);
    assert_eq!(a, TestId(0));
    assert_eq!(b, TestId(1));
    assert_eq!(v.len(), 2);
}

#[test]
fn test_index_round_trip() {
    let id = TestId::from_usize(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn test_get_out_of_bounds() {
    let v: IndexVec<TestId, i32> = IndexVec::new();
    assert!(v.get(TestId(0)).is_none());
}

#[test]
fn test_index_mut() {
    let mut v: IndexVec<TestId, i32> = IndexVec::new();
    let id = v.push(1);
    v[id] = 5;
    assert_eq!(v[id], 5);
}

#[test]
fn test_next_index() {
    let mut v: IndexVec<TestId, i32> = IndexVec::new();
    assert_eq!(v.next_index(), TestId(0));
    v.push(1);
    assert_eq!(v.next_index(), TestId(1));
}

#[test]
fn test_iter_enumerated() {
    let mut v: IndexVec<TestId, &str> = IndexVec::new();
    v.push("a");
    v.push("b");

    let pairs: Vec<_> = v.iter_enumerated().collect();
    assert_eq!(pairs, vec![(TestId(0), &"a"), (TestId(1), &"b")]);
}

#[test]
fn test_empty_and_default() {
    let v: IndexVec<TestId, i32> = IndexVec::default();
    assert!(v.is_empty());
    assert_eq!(v.len(), 0);
}
