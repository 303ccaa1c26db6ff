//! Environments: namespaces for components and entity names.

use std::sync::Arc;

use ocs_foundation::{EntityId, Namespace};

use crate::component::Component;
use crate::table::Table;

/// A namespace holding a component table and an entity-name table.
///
/// Both tables are created with the environment and live as long as it does.
#[derive(Debug, Clone)]
pub struct Environment {
    name: Arc<str>,
    pub(crate) components: Table<Component>,
    pub(crate) entities: Table<EntityId>,
}

impl Environment {
    pub(crate) fn new(name: Arc<str>) -> Self {
        Self {
            components: Table::scoped(Namespace::Component, Arc::clone(&name)),
            entities: Table::scoped(Namespace::Entity, Arc::clone(&name)),
            name,
        }
    }

    /// The environment's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if a component with this name is declared here.
    #[must_use]
    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains(name)
    }

    /// Looks up a component.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.lookup(name)
    }

    /// Looks up an entity id by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<EntityId> {
        self.entities.lookup(name).copied()
    }

    /// Component names in declaration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.names().map(|n| &**n)
    }

    /// Entity names in declaration order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.names().map(|n| &**n)
    }
}
