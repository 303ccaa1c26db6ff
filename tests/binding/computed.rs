//! Integration tests for computed bundles
//!
//! Tests read-through keys and write handling under both policies.

use std::cell::Cell;
use std::rc::Rc;

use ocs::prelude::*;

use crate::registry;

fn with_label(config: RegistryConfig) -> Registry {
    let mut registry = registry(config);
    registry
        .declare_component("world", "label", |_| {
            ComputedBundle::new(["label", "env"], |entity, key| match key {
                "label" => Value::from(format!("<{}>", entity.name())),
                _ => Value::from(entity.environment()),
            })
            .into()
        })
        .unwrap();
    registry
}

#[test]
fn reads_call_the_hook_with_the_owner() {
    let mut registry = with_label(RegistryConfig::default());
    let e = registry.declare_entity("world", "hero", None).unwrap();
    registry.add_component(e, "label", &[]).unwrap();

    assert_eq!(registry.get(e, "label").unwrap(), Value::from("<hero>"));
    assert_eq!(registry.get(e, "env").unwrap(), Value::from("world"));
}

#[test]
fn every_read_recomputes() {
    let mut registry = registry(RegistryConfig::default());
    let reads = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reads);
    registry
        .declare_component("world", "clock", move |_| {
            let counter = Rc::clone(&counter);
            ComputedBundle::new(["now"], move |_, _| {
                counter.set(counter.get() + 1);
                Value::Int(counter.get())
            })
            .into()
        })
        .unwrap();
    let e = registry.declare_entity("world", "e", None).unwrap();
    registry.add_component(e, "clock", &[]).unwrap();

    assert_eq!(registry.get(e, "now").unwrap(), Value::Int(1));
    assert_eq!(registry.get(e, "now").unwrap(), Value::Int(2));
    assert_eq!(reads.get(), 2);
}

#[test]
fn strict_writes_are_rejected() {
    let mut registry = with_label(RegistryConfig::strict());
    let e = registry.declare_entity("world", "hero", None).unwrap();
    registry.add_component(e, "label", &[]).unwrap();

    let err = registry.set(e, "label", "x").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ReadOnlyProperty { .. }));
    assert_eq!(registry.get(e, "label").unwrap(), Value::from("<hero>"));
}

#[test]
fn permissive_writes_are_ignored() {
    let mut registry = with_label(RegistryConfig::permissive());
    let e = registry.declare_entity("world", "hero", None).unwrap();
    registry.add_component(e, "label", &[]).unwrap();

    registry.set(e, "label", "x").unwrap();
    assert_eq!(registry.get(e, "label").unwrap(), Value::from("<hero>"));
}

#[test]
fn removal_stubs_computed_keys() {
    let mut registry = with_label(RegistryConfig::default());
    let e = registry.declare_entity("world", "hero", None).unwrap();
    registry.add_component(e, "label", &[]).unwrap();
    registry.remove_component(e, "label").unwrap();

    assert_eq!(registry.get(e, "label").unwrap(), Value::Nil);
    assert!(registry.node(e, "label").unwrap().is_none());
}
