//! Per-entity property surface.
//!
//! Each entity maps property keys to a [`Property`] variant, and every read
//! and write is routed through [`PropertySurface`]. This is where event hooks
//! fire and computed keys are evaluated.

use std::collections::HashMap;
use std::sync::Arc;

use ocs_foundation::{EntityId, EntityRef, Error, ErrorKind, Result, Value};

use crate::bundle::{Node, ReadHook, WriteHook, write_through};
use crate::config::CollisionPolicy;
use crate::registry::Registry;

/// How a single key on an entity behaves.
#[derive(Clone)]
pub enum Property {
    /// Installed by an event bundle: the entity keeps its own copy of the
    /// value and calls the hook after each write.
    Stored {
        /// Last written value.
        value: Value,
        /// Hook called after each write.
        hook: WriteHook,
    },
    /// Installed by a computed bundle: no storage, every read calls the hook.
    Computed {
        /// Hook producing the value.
        hook: ReadHook,
    },
    /// Ordinary property (plain bundle key or ad-hoc write).
    Plain(Node),
    /// Left behind when an event or computed component is removed. Reads
    /// give `Nil`, writes are discarded.
    Inert,
}

impl Property {
    /// Returns false for inert stubs.
    #[must_use]
    pub fn is_exposed(&self) -> bool {
        !matches!(self, Self::Inert)
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored { value, .. } => write!(f, "Stored({value:?})"),
            Self::Computed { .. } => write!(f, "Computed"),
            Self::Plain(node) => write!(f, "Plain({node:?})"),
            Self::Inert => write!(f, "Inert"),
        }
    }
}

/// Keyed properties of one entity, in installation order.
#[derive(Clone, Debug, Default)]
pub struct PropertySurface {
    properties: HashMap<Arc<str>, Property>,
    order: Vec<Arc<str>>,
}

impl PropertySurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw property under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Returns true if `key` is present and not an inert stub.
    #[must_use]
    pub fn exposes(&self, key: &str) -> bool {
        self.properties.get(key).is_some_and(Property::is_exposed)
    }

    /// Exposed keys in installation order.
    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.order.iter().filter(|key| self.exposes(key))
    }

    /// Installs or replaces a property.
    pub fn insert(&mut self, key: Arc<str>, property: Property) {
        if !self.properties.contains_key(&key) {
            self.order.push(Arc::clone(&key));
        }
        self.properties.insert(key, property);
    }

    /// Replaces `key` with an inert stub, dropping any stored value.
    pub fn stub(&mut self, key: Arc<str>) {
        self.insert(key, Property::Inert);
    }

    /// Deletes `key` outright.
    pub fn remove(&mut self, key: &str) -> Option<Property> {
        let removed = self.properties.remove(key)?;
        self.order.retain(|k| &**k != key);
        Some(removed)
    }

    /// Reads `key` on behalf of `owner`.
    ///
    /// # Errors
    ///
    /// Returns `CompositeProperty` if the key holds a nested plain node.
    pub fn read(&self, key: &str, owner: &EntityRef) -> Result<Value> {
        match self.properties.get(key) {
            None | Some(Property::Inert) => Ok(Value::Nil),
            Some(Property::Stored { value, .. }) => Ok(value.clone()),
            Some(Property::Computed { hook }) => Ok(hook(owner, key)),
            Some(Property::Plain(Node::Leaf(value))) => Ok(value.clone()),
            Some(Property::Plain(_)) => Err(Error::new(ErrorKind::CompositeProperty {
                key: key.to_string(),
            })),
        }
    }

    /// Reads `key` as a node. Intercepted keys are evaluated into a leaf.
    #[must_use]
    pub fn node(&self, key: &str, owner: &EntityRef) -> Option<Node> {
        match self.properties.get(key)? {
            Property::Inert => None,
            Property::Stored { value, .. } => Some(Node::Leaf(value.clone())),
            Property::Computed { hook } => Some(Node::Leaf(hook(owner, key))),
            Property::Plain(node) => Some(node.clone()),
        }
    }

    /// Writes `key` on behalf of `owner`.
    ///
    /// Writing a key that does not exist creates an ordinary property.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnlyProperty` for computed keys under the strict policy.
    pub fn write(
        &mut self,
        key: &str,
        value: Value,
        owner: &EntityRef,
        policy: CollisionPolicy,
    ) -> Result<()> {
        match self.properties.get_mut(key) {
            Some(Property::Stored { value: slot, hook }) => {
                write_through(hook, owner, key, value, |v| *slot = v);
            }
            Some(Property::Computed { .. }) => {
                if policy == CollisionPolicy::Strict {
                    return Err(Error::read_only(key));
                }
            }
            Some(Property::Plain(node)) => *node = Node::Leaf(value),
            Some(Property::Inert) => {}
            None => self.insert(key.into(), Property::Plain(Node::Leaf(value))),
        }
        Ok(())
    }
}

impl Registry {
    /// Reads a property of an entity.
    ///
    /// Event keys return their stored value, computed keys call their hook,
    /// plain leaves return their value, and absent or removed keys give `Nil`.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles and for keys holding nested nodes (use
    /// [`Registry::node`] for those).
    pub fn get(&self, entity: EntityId, key: &str) -> Result<Value> {
        let target = self.entity(entity)?;
        target.properties().read(key, target.handle())
    }

    /// Reads a property of an entity as a node, giving access to nested
    /// objects and sub-bundles.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles.
    pub fn node(&self, entity: EntityId, key: &str) -> Result<Option<Node>> {
        let target = self.entity(entity)?;
        Ok(target.properties().node(key, target.handle()))
    }

    /// Writes a property of an entity.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles, and for computed keys under the strict
    /// policy.
    pub fn set(&mut self, entity: EntityId, key: &str, value: impl Into<Value>) -> Result<()> {
        let policy = self.config().collision;
        self.entity_mut(entity)?.write(key, value.into(), policy)
    }

    /// Exposed keys of an entity, in installation order.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles.
    pub fn keys(&self, entity: EntityId) -> Result<Vec<Arc<str>>> {
        Ok(self.entity(entity)?.properties().keys().cloned().collect())
    }
}
