//! Tags: global labels grouping entities across environments.

use std::sync::Arc;

use ocs_foundation::EntityId;

use crate::table::MemberSet;

/// A globally named label and the entities carrying it.
#[derive(Debug, Clone)]
pub struct Tag {
    name: Arc<str>,
    entities: MemberSet,
}

impl Tag {
    pub(crate) fn new(name: Arc<str>) -> Self {
        Self {
            name,
            entities: MemberSet::new(),
        }
    }

    /// The tag's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tagged entities, in tagging order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        self.entities.as_slice()
    }

    pub(crate) fn members(&self) -> &MemberSet {
        &self.entities
    }

    pub(crate) fn members_mut(&mut self) -> &mut MemberSet {
        &mut self.entities
    }
}
