//! Integration tests for entity handles
//!
//! Tests EntityId sentinels and formatting, and EntityRef attachment state.

use ocs::foundation::{EntityId, EntityRef};

#[test]
fn null_id_is_distinct() {
    let null = EntityId::null();
    assert!(null.is_null());
    assert!(!EntityId::new(0, 1).is_null());
    assert_ne!(null, EntityId::new(0, 0));
}

#[test]
fn id_formatting() {
    let id = EntityId::new(42, 3);
    assert_eq!(format!("{id:?}"), "EntityId(42v3)");
    assert_eq!(format!("{id}"), "Entity(42)");
    assert_eq!(format!("{:?}", EntityId::null()), "EntityId(null)");
}

#[test]
fn detached_ref_has_null_id() {
    let handle = EntityRef::detached();
    assert!(handle.is_detached());
    assert!(handle.id().is_null());
    assert_eq!(format!("{handle:?}"), "EntityRef(detached)");
    assert!(EntityRef::default().is_detached());
}

#[test]
fn attached_ref_exposes_names() {
    let handle = EntityRef::new(EntityId::new(1, 1), "world".into(), "player".into());
    assert!(!handle.is_detached());
    assert_eq!(handle.environment(), "world");
    assert_eq!(handle.name(), "player");
    assert_eq!(format!("{handle:?}"), "EntityRef(world/player EntityId(1v1))");
}
