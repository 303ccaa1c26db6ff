//! Integration tests for Layer 1: Registry
//!
//! Tests for declarations, lifecycle cascades, tags, singletons, and queries.

mod cascades;
mod singletons;

use ocs::prelude::*;

/// A quiet registry with one environment, `world`, and three plain
/// components `a`, `b` and `c`, each installing a key of its own name.
pub fn world() -> Registry {
    let mut registry = Registry::with_config(RegistryConfig::default().with_announce(false));
    registry.declare_environment("world").unwrap();
    for name in ["a", "b", "c"] {
        registry
            .declare_component("world", name, move |_| {
                PlainBundle::new().with_value(name, 1).into()
            })
            .unwrap();
    }
    registry
}
