//! Integration tests for depth-limited wiring
//!
//! Tests which event and computed sub-bundles of a plain bundle get the
//! entity as their owner.

use std::cell::RefCell;
use std::rc::Rc;

use ocs::prelude::*;

use crate::registry;

/// A plain bundle with an event sub-bundle at depth 1 (`shallow`) and one at
/// depth 2 (`nested.deep`). Each hook records the owner it was called with.
fn declare_tree(registry: &mut Registry, seen: &Rc<RefCell<Vec<EntityRef>>>) {
    let seen = Rc::clone(seen);
    registry
        .declare_component("world", "tree", move |_| {
            let shallow_log = Rc::clone(&seen);
            let deep_log = Rc::clone(&seen);
            PlainBundle::new()
                .with(
                    "shallow",
                    EventBundle::new([("x", 0)], move |entity, _, _| {
                        shallow_log.borrow_mut().push(entity.clone());
                        Value::Nil
                    }),
                )
                .with(
                    "nested",
                    PlainBundle::new().with(
                        "deep",
                        EventBundle::new([("y", 0)], move |entity, _, _| {
                            deep_log.borrow_mut().push(entity.clone());
                            Value::Nil
                        }),
                    ),
                )
                .into()
        })
        .unwrap();
}

fn event_at(registry: &Registry, entity: EntityId, path: &[&str]) -> EventBundle {
    let mut node = registry.node(entity, path[0]).unwrap().unwrap();
    for key in &path[1..] {
        node = node.as_object().unwrap().get(key).unwrap().clone();
    }
    node.as_event().unwrap().clone()
}

#[test]
fn default_limit_wires_only_shallow_bundles() {
    let seen = Rc::default();
    let mut registry = registry(RegistryConfig::default());
    declare_tree(&mut registry, &seen);
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "tree", &[]).unwrap();

    let shallow = event_at(&registry, e, &["shallow"]);
    let deep = event_at(&registry, e, &["nested", "deep"]);
    assert_eq!(shallow.owner().id(), e);
    assert!(deep.owner().is_detached());

    deep.set("y", 1);
    assert!(seen.borrow()[0].is_detached());
}

#[test]
fn deeper_limit_reaches_nested_bundles() {
    let seen = Rc::default();
    let mut registry = registry(RegistryConfig::default());
    declare_tree(&mut registry, &seen);
    let e = registry.declare_entity("world", "e", Some(3)).unwrap();
    registry.add_component(e, "tree", &[]).unwrap();

    let deep = event_at(&registry, e, &["nested", "deep"]);
    deep.set("y", 1);
    assert_eq!(seen.borrow()[0].id(), e);
    assert_eq!(seen.borrow()[0].name(), "e");
}

#[test]
fn limit_one_wires_nothing_below_the_root() {
    let seen = Rc::default();
    let mut registry = registry(RegistryConfig::default());
    declare_tree(&mut registry, &seen);
    let e = registry.declare_entity("world", "e", Some(1)).unwrap();
    registry.add_component(e, "tree", &[]).unwrap();

    assert!(event_at(&registry, e, &["shallow"]).owner().is_detached());
}

#[test]
fn sub_bundle_state_is_shared_through_nodes() {
    let seen = Rc::default();
    let mut registry = registry(RegistryConfig::default());
    declare_tree(&mut registry, &seen);
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "tree", &[]).unwrap();

    event_at(&registry, e, &["shallow"]).set("x", 9);
    assert_eq!(registry.node(e, "shallow").unwrap().unwrap().read("x"), Value::Int(9));
    assert_eq!(seen.borrow().len(), 1);
}
