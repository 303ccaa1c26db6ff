//! Registry and property binding engine for OCS.
//!
//! This crate provides:
//! - [`Registry`] - Environments, components, entities, tags and singletons
//! - [`Bundle`] - What a component's builder returns, in one of three shapes
//! - The binding engine ([`Registry::add_component`], [`Registry::remove_component`])
//! - Property access with event and computed interception ([`Registry::get`], [`Registry::set`])
//! - Multi-component queries ([`Registry::get_all_with_components`])
//!
//! # Example
//!
//! ```
//! use ocs_registry::{EventBundle, Registry, RegistryConfig};
//! use ocs_foundation::Value;
//!
//! let mut registry = Registry::with_config(RegistryConfig::default().with_announce(false));
//! registry.declare_environment("world").unwrap();
//! registry
//!     .declare_component("world", "health", |_| {
//!         EventBundle::new([("hp", 100)], |_, _, _| Value::Nil).into()
//!     })
//!     .unwrap();
//!
//! let player = registry.declare_entity("world", "player", None).unwrap();
//! registry.add_component(player, "health", &[]).unwrap();
//! registry.set(player, "hp", 50).unwrap();
//! assert_eq!(registry.get(player, "hp").unwrap(), Value::Int(50));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod binding;
mod bundle;
mod component;
mod config;
mod entity;
mod environment;
mod property;
mod query;
mod registry;
mod singleton;
mod table;
mod tag;

pub use bundle::{
    Builder, Bundle, ComputedBundle, EventBundle, Node, PlainBundle, ReadHook, Shape, WriteHook,
};
pub use component::Component;
pub use config::{CollisionPolicy, RegistryConfig};
pub use entity::{Entity, EntityStore};
pub use environment::Environment;
pub use property::{Property, PropertySurface};
pub use query::ComponentQuery;
pub use registry::{Registry, RegistryId};
pub use singleton::Singleton;
pub use table::{MemberSet, Table};
pub use tag::Tag;
