//! Integration tests for key collisions
//!
//! Tests the strict and permissive collision policies and atomicity of a
//! rejected install.

use ocs::prelude::*;

use crate::registry;

fn with_two_health_sources(config: RegistryConfig) -> Registry {
    let mut registry = registry(config);
    registry
        .declare_component("world", "health", |_| {
            EventBundle::new([("hp", 100)], |_, _, _| Value::Nil).into()
        })
        .unwrap();
    registry
        .declare_component("world", "armor", |_| {
            PlainBundle::new()
                .with_value("defense", 5)
                .with_value("hp", 20)
                .into()
        })
        .unwrap();
    registry
}

#[test]
fn strict_collision_is_rejected_before_any_write() {
    let mut registry = with_two_health_sources(RegistryConfig::strict());
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "health", &[]).unwrap();
    registry.set(e, "hp", 70).unwrap();

    let err = registry.add_component(e, "armor", &[]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateDeclaration {
            namespace: Namespace::Property,
            ..
        }
    ));
    assert_eq!(err.to_string(), "key (hp) in (e) has already been declared");
    let context = err.context.unwrap();
    assert_eq!(context.operation.as_deref(), Some("add_component"));
    assert_eq!(context.path, ["world", "e"]);

    assert_eq!(registry.get(e, "hp").unwrap(), Value::Int(70));
    assert_eq!(registry.get(e, "defense").unwrap(), Value::Nil);
    assert!(!registry.has_component(e, "armor"));
    assert!(registry.component("world", "armor").unwrap().entities().is_empty());
}

#[test]
fn ad_hoc_keys_collide_too() {
    let mut registry = with_two_health_sources(RegistryConfig::strict());
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.set(e, "hp", 1).unwrap();

    assert!(registry.add_component(e, "health", &[]).unwrap_err().is_duplicate());
    assert_eq!(registry.get(e, "hp").unwrap(), Value::Int(1));
}

#[test]
fn stubbed_keys_do_not_collide() {
    let mut registry = with_two_health_sources(RegistryConfig::strict());
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "health", &[]).unwrap();
    registry.remove_component(e, "health").unwrap();

    registry.add_component(e, "armor", &[]).unwrap();
    assert_eq!(registry.get(e, "hp").unwrap(), Value::Int(20));
}

#[test]
fn attaching_twice_is_a_duplicate() {
    let mut registry = with_two_health_sources(RegistryConfig::permissive());
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "health", &[]).unwrap();

    let err = registry.add_component(e, "health", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "component (health) in (e) has already been declared"
    );
    assert_eq!(registry.component("world", "health").unwrap().entities(), &[e]);
}

#[test]
fn permissive_policy_overwrites() {
    let mut registry = with_two_health_sources(RegistryConfig::permissive());
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "health", &[]).unwrap();
    registry.add_component(e, "armor", &[]).unwrap();

    assert_eq!(registry.get(e, "hp").unwrap(), Value::Int(20));
    assert!(registry.has_component(e, "health"));
    assert!(registry.has_component(e, "armor"));
}

#[test]
fn unknown_component_is_rejected() {
    let mut registry = with_two_health_sources(RegistryConfig::default());
    let e = registry.declare_entity("world", "e", None).unwrap();

    let err = registry.add_component(e, "shield", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "component (shield) has not been declared in (world)"
    );
}

#[test]
fn stale_handle_context_falls_back_to_the_id() {
    let mut registry = with_two_health_sources(RegistryConfig::default());
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.destroy_entity(e).unwrap();

    let err = registry.add_component(e, "health", &[]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleEntity(_)));
    let context = err.context.unwrap();
    assert_eq!(context.to_string(), format!("in add_component at {e}"));
}
