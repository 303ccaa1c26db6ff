//! Entity identifiers with generational indices, and named entity handles.

use std::fmt;
use std::sync::Arc;

/// Entity identifier with generational index for stale reference detection.
///
/// The generation counter increments when an entity index is reused after destruction,
/// allowing detection of stale references to destroyed entities.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct EntityId {
    /// Index into entity storage.
    pub index: u64,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl EntityId {
    /// Creates a new entity ID with the given index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns a sentinel value representing "no entity".
    ///
    /// This uses `u64::MAX` as the index, which should never be allocated.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            index: u64::MAX,
            generation: 0,
        }
    }

    /// Returns true if this is the null sentinel value.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index == u64::MAX
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({}v{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({})", self.index)
        }
    }
}

/// Identity of an entity as seen by property hooks.
///
/// Carries the generational id plus the environment and entity names, so a
/// hook can tell which object it is acting for without borrowing the
/// registry. Bundles that were never wired to an entity hold a detached
/// handle.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    id: EntityId,
    environment: Arc<str>,
    name: Arc<str>,
}

impl EntityRef {
    /// Creates a handle for a live entity.
    #[must_use]
    pub fn new(id: EntityId, environment: Arc<str>, name: Arc<str>) -> Self {
        Self {
            id,
            environment,
            name,
        }
    }

    /// Returns the handle used before a bundle is wired to an entity.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            id: EntityId::null(),
            environment: Arc::from(""),
            name: Arc::from(""),
        }
    }

    /// Returns true if this handle does not point at any entity.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.id.is_null()
    }

    /// The generational id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Name of the owning environment.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Name of the entity within its environment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for EntityRef {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            write!(f, "EntityRef(detached)")
        } else {
            write!(f, "EntityRef({}/{} {:?})", self.environment, self.name, self.id)
        }
    }
}
