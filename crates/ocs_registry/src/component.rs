//! Components: named builders plus the reverse index of entities using them.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use ocs_foundation::{EntityId, Value};

use crate::bundle::{Builder, Bundle};
use crate::table::MemberSet;

/// A reusable property template declared in an environment.
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    environment: Arc<str>,
    builder: Builder,
    entities: MemberSet,
}

impl Component {
    pub(crate) fn new(name: Arc<str>, environment: Arc<str>, builder: Builder) -> Self {
        Self {
            name,
            environment,
            builder,
            entities: MemberSet::new(),
        }
    }

    /// The component's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment that owns this component.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Calls the builder.
    #[must_use]
    pub fn build(&self, params: &[Value]) -> Bundle {
        (self.builder)(params)
    }

    /// Entities the component is attached to, in attachment order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        self.entities.as_slice()
    }

    /// Returns true if both components call the same builder.
    #[must_use]
    pub fn shares_builder(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.builder, &other.builder)
    }

    pub(crate) fn builder(&self) -> Builder {
        Rc::clone(&self.builder)
    }

    pub(crate) fn members(&self) -> &MemberSet {
        &self.entities
    }

    pub(crate) fn members_mut(&mut self) -> &mut MemberSet {
        &mut self.entities
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("environment", &self.environment)
            .field("entities", &self.entities.as_slice())
            .finish_non_exhaustive()
    }
}
