//! Integration tests for singletons
//!
//! Tests declaration, sharing through duplication, and destroy semantics.

use std::cell::RefCell;
use std::rc::Rc;

use crate::world;

#[derive(Debug, Default)]
struct Scoreboard {
    points: RefCell<i64>,
}

#[test]
fn duplicates_share_one_instance() {
    let mut registry = world();
    registry
        .declare_singleton("score", Rc::new(Scoreboard::default()))
        .unwrap();
    registry.duplicate_singleton("score", "points").unwrap();

    let score = registry.singleton("score").unwrap();
    let points = registry.singleton("points").unwrap();
    assert!(score.shares_instance(points));

    *score.downcast::<Scoreboard>().unwrap().points.borrow_mut() += 5;
    assert_eq!(*points.downcast::<Scoreboard>().unwrap().points.borrow(), 5);
}

#[test]
fn destroy_removes_only_that_entry() {
    let mut registry = world();
    let board = Rc::new(Scoreboard::default());
    registry.declare_singleton("score", Rc::clone(&board)).unwrap();
    registry.duplicate_singleton("score", "points").unwrap();

    registry.destroy_singleton("score").unwrap();

    assert!(registry.singleton("score").is_none());
    let survivor = registry.singleton("points").unwrap().downcast::<Scoreboard>().unwrap();
    assert!(Rc::ptr_eq(&survivor, &board));
    assert_eq!(registry.singleton_names().collect::<Vec<_>>(), ["points"]);
}

#[test]
fn duplicate_singleton_errors() {
    let mut registry = world();
    registry.declare_singleton("a", Rc::new(1u8)).unwrap();
    registry.declare_singleton("b", Rc::new(2u8)).unwrap();

    assert!(registry.duplicate_singleton("missing", "c").unwrap_err().is_unknown());
    assert!(registry.duplicate_singleton("a", "b").unwrap_err().is_duplicate());
    assert_eq!(registry.singleton("b").unwrap().downcast::<u8>().as_deref(), Some(&2));
}

#[test]
fn downcast_to_wrong_type_is_none() {
    let mut registry = world();
    registry.declare_singleton("name", Rc::new(String::from("ocs"))).unwrap();
    assert!(registry.singleton("name").unwrap().downcast::<i64>().is_none());
}
