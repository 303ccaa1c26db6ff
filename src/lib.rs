//! OCS - Object composition system
//!
//! OOP-style entities assembled from ECS-style components. This crate
//! re-exports all layers for convenient access. For detailed documentation,
//! see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: ocs_registry   — Environments, components, entities, tags,
//!                           singletons, property binding, queries
//! Layer 0: ocs_foundation — Core types (Value, EntityId, EntityRef, Error)
//! ```

pub use ocs_foundation as foundation;
pub use ocs_registry as registry;

/// The types most programs need.
pub mod prelude {
    pub use ocs_foundation::{EntityId, EntityRef, Error, ErrorKind, Namespace, Result, Value};
    pub use ocs_registry::{
        Bundle, CollisionPolicy, ComputedBundle, EventBundle, Node, PlainBundle, Registry,
        RegistryConfig,
    };
}
