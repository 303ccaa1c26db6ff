//! Integration tests for lifecycle cascades
//!
//! Tests that destroying and duplicating entities and components keeps
//! every reverse index consistent.

use ocs::prelude::*;

use crate::world;

// =============================================================================
// Entity destroy
// =============================================================================

#[test]
fn destroyed_entity_leaves_every_index() {
    let mut registry = world();
    registry.declare_tag("enemy").unwrap();
    let e = registry.declare_entity("world", "orc", None).unwrap();
    registry.add_component(e, "a", &[]).unwrap();
    registry.add_component(e, "b", &[]).unwrap();
    registry.add_tag(e, "enemy").unwrap();
    assert_eq!(registry.component("world", "a").unwrap().entities(), &[e]);

    registry.destroy_entity(e).unwrap();

    assert!(registry.component("world", "a").unwrap().entities().is_empty());
    assert!(registry.component("world", "b").unwrap().entities().is_empty());
    assert!(registry.tag("enemy").unwrap().entities().is_empty());
    assert!(registry.entity_id("world", "orc").is_none());
    assert!(!registry.exists(e));
}

#[test]
fn destroyed_handle_is_stale_everywhere() {
    let mut registry = world();
    let e = registry.declare_entity("world", "ghost", None).unwrap();
    registry.destroy_entity(e).unwrap();

    let stale = |err: Error| matches!(err.kind, ErrorKind::StaleEntity(_));
    assert!(stale(registry.entity(e).unwrap_err()));
    assert!(stale(registry.get(e, "a").unwrap_err()));
    assert!(stale(registry.set(e, "a", 1).unwrap_err()));
    assert!(stale(registry.add_component(e, "a", &[]).unwrap_err()));
    assert!(stale(registry.destroy_entity(e).unwrap_err()));
    assert!(!registry.has_component(e, "a"));
}

#[test]
fn other_entities_survive_a_destroy() {
    let mut registry = world();
    let e1 = registry.declare_entity("world", "e1", None).unwrap();
    let e2 = registry.declare_entity("world", "e2", None).unwrap();
    registry.add_component(e1, "a", &[]).unwrap();
    registry.add_component(e2, "a", &[]).unwrap();

    registry.destroy_entity(e1).unwrap();

    assert_eq!(registry.component("world", "a").unwrap().entities(), &[e2]);
    assert_eq!(registry.get(e2, "a").unwrap(), Value::Int(1));
}

// =============================================================================
// Component destroy
// =============================================================================

#[test]
fn destroyed_component_is_removed_from_all_holders() {
    let mut registry = world();
    let e1 = registry.declare_entity("world", "e1", None).unwrap();
    let e2 = registry.declare_entity("world", "e2", None).unwrap();
    registry.add_component(e1, "c", &[]).unwrap();
    registry.add_component(e2, "c", &[]).unwrap();

    registry.destroy_component("world", "c").unwrap();

    assert!(!registry.has_component(e1, "c"));
    assert!(!registry.has_component(e2, "c"));
    assert!(!registry.environment("world").unwrap().has_component("c"));
    assert_eq!(registry.get(e1, "c").unwrap(), Value::Nil);
    assert!(registry.keys(e2).unwrap().is_empty());
}

#[test]
fn destroying_a_missing_component_fails() {
    let mut registry = world();
    assert!(registry.destroy_component("world", "z").unwrap_err().is_unknown());
    assert!(registry.destroy_component("menu", "a").unwrap_err().is_unknown());
}

#[test]
fn destroyed_component_name_can_be_redeclared() {
    let mut registry = world();
    registry.destroy_component("world", "a").unwrap();
    registry
        .declare_component("world", "a", |_| PlainBundle::new().with_value("fresh", true).into())
        .unwrap();

    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "a", &[]).unwrap();
    assert_eq!(registry.get(e, "fresh").unwrap(), Value::Bool(true));
}

// =============================================================================
// Component duplicate
// =============================================================================

#[test]
fn duplicated_component_shares_builder_not_members() {
    let mut registry = world();
    registry.declare_environment("menu").unwrap();
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "a", &[]).unwrap();

    registry.duplicate_component("world", "a", "menu").unwrap();

    let original = registry.component("world", "a").unwrap();
    let copy = registry.component("menu", "a").unwrap();
    assert!(original.shares_builder(copy));
    assert_eq!(copy.environment(), "menu");
    assert!(copy.entities().is_empty());
    assert_eq!(original.entities(), &[e]);
}

#[test]
fn duplicated_component_binds_independently() {
    let mut registry = world();
    registry.declare_environment("menu").unwrap();
    registry.duplicate_component("world", "a", "menu").unwrap();
    let m = registry.declare_entity("menu", "m", None).unwrap();
    registry.add_component(m, "a", &[]).unwrap();

    assert_eq!(registry.get(m, "a").unwrap(), Value::Int(1));
    assert!(registry.component("world", "a").unwrap().entities().is_empty());

    registry.destroy_component("world", "a").unwrap();
    assert!(registry.has_component(m, "a"));
}

#[test]
fn duplicate_component_errors() {
    let mut registry = world();
    registry.declare_environment("menu").unwrap();

    let err = registry.duplicate_component("world", "a", "nowhere").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownReference {
            namespace: Namespace::Environment,
            ..
        }
    ));
    assert!(registry.duplicate_component("nowhere", "a", "menu").unwrap_err().is_unknown());
    assert!(registry.duplicate_component("world", "z", "menu").unwrap_err().is_unknown());

    registry.duplicate_component("world", "a", "menu").unwrap();
    let err = registry.duplicate_component("world", "a", "menu").unwrap_err();
    assert_eq!(
        err.to_string(),
        "component (a) in (menu) has already been declared"
    );
}
