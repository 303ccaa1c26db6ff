//! Integration tests for persistent collections
//!
//! Tests structural sharing semantics of LtVec and LtMap.

use ocs::foundation::{LtMap, LtVec};

#[test]
fn vec_push_back_leaves_original_untouched() {
    let empty: LtVec<i32> = LtVec::new();
    let one = empty.push_back(1);
    let two = one.push_back(2);

    assert!(empty.is_empty());
    assert_eq!(one.len(), 1);
    assert_eq!(two.iter().copied().collect::<Vec<_>>(), [1, 2]);
}

#[test]
fn vec_equality_is_structural() {
    let a: LtVec<i32> = (0..5).collect();
    let b = (0..4).collect::<LtVec<i32>>().push_back(4);
    assert_eq!(a, b);
}

#[test]
fn map_insert_is_persistent() {
    let base: LtMap<&str, i32> = LtMap::new();
    let one = base.insert("a", 1);
    let two = one.insert("a", 2);

    assert_eq!(base.get(&"a"), None);
    assert_eq!(one.get(&"a"), Some(&1));
    assert_eq!(two.get(&"a"), Some(&2));
    assert_eq!(two.len(), 1);
}

#[test]
fn map_from_iterator() {
    let map: LtMap<i32, i32> = (0..10).map(|i| (i, i * i)).collect();
    assert_eq!(map.len(), 10);
    assert_eq!(map.get(&3), Some(&9));
}
