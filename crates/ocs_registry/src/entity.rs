//! Entities and their generational storage.
//!
//! The `EntityStore` owns every live [`Entity`] and tracks generations so
//! that handles to destroyed entities are detected as stale.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::sync::Arc;

use ocs_foundation::{EntityId, EntityRef, Error, Result, Value};

use crate::config::CollisionPolicy;
use crate::property::PropertySurface;

/// A composable object: a named member of an environment whose properties
/// come from its attached components.
#[derive(Debug, Clone)]
pub struct Entity {
    handle: EntityRef,
    depth_limit: usize,
    /// Attached component names, in attachment order.
    components: Vec<Arc<str>>,
    /// Tag names, in tagging order.
    tags: Vec<Arc<str>>,
    properties: PropertySurface,
}

impl Entity {
    pub(crate) fn new(handle: EntityRef, depth_limit: usize) -> Self {
        Self {
            handle,
            depth_limit,
            components: Vec::new(),
            tags: Vec::new(),
            properties: PropertySurface::new(),
        }
    }

    /// The generational id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.handle.id()
    }

    /// The entity's name within its environment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// The owning environment's name.
    #[must_use]
    pub fn environment(&self) -> &str {
        self.handle.environment()
    }

    /// The handle passed to property hooks.
    #[must_use]
    pub fn handle(&self) -> &EntityRef {
        &self.handle
    }

    /// How deep plain bundles are walked when wiring sub-bundles.
    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    /// Returns true if the named component is attached.
    #[must_use]
    pub fn has_component(&self, component: &str) -> bool {
        self.components.iter().any(|c| &**c == component)
    }

    /// Attached component names, in attachment order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| &**c)
    }

    /// Returns true if the entity carries the tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| &**t == tag)
    }

    /// Tag names, in tagging order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| &**t)
    }

    /// The property surface.
    #[must_use]
    pub fn properties(&self) -> &PropertySurface {
        &self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut PropertySurface {
        &mut self.properties
    }

    pub(crate) fn write(&mut self, key: &str, value: Value, policy: CollisionPolicy) -> Result<()> {
        self.properties.write(key, value, &self.handle, policy)
    }

    pub(crate) fn attach_component(&mut self, component: Arc<str>) {
        if !self.has_component(&component) {
            self.components.push(component);
        }
    }

    pub(crate) fn detach_component(&mut self, component: &str) {
        self.components.retain(|c| &**c != component);
    }

    pub(crate) fn attach_tag(&mut self, tag: Arc<str>) {
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    pub(crate) fn detach_tag(&mut self, tag: &str) {
        self.tags.retain(|t| &**t != tag);
    }
}

/// One index of the store.
#[derive(Debug, Clone)]
struct Slot {
    /// Even generations are free, odd generations are alive.
    generation: u32,
    entity: Option<Entity>,
}

/// Owns live entities and manages generational ids.
///
/// Indices are reused from a free list. Every spawn and every despawn bumps
/// the slot's generation, so an old id never matches a reused slot.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
    /// Free list of indices available for reuse.
    free_list: Vec<u64>,
    live_count: usize,
}

impl EntityStore {
    /// Creates a new empty entity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an id and stores the entity built for it.
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        self.live_count += 1;

        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            EntityId::new(index, slot.generation)
        } else {
            // New slots start at generation 1 (odd = alive)
            self.slots.push(Slot {
                generation: 1,
                entity: None,
            });
            EntityId::new(self.slots.len() as u64 - 1, 1)
        };

        self.slots[id.index as usize].entity = Some(build(id));
        id
    }

    /// Removes an entity and frees its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is stale or was never allocated.
    pub fn despawn(&mut self, id: EntityId) -> Result<Entity> {
        self.validate(id)?;

        let slot = &mut self.slots[id.index as usize];
        // Odd/alive becomes even/free
        slot.generation += 1;
        let entity = slot
            .entity
            .take()
            .ok_or_else(|| Error::entity_not_found(id))?;
        self.free_list.push(id.index);
        self.live_count -= 1;

        Ok(entity)
    }

    /// Checks if an entity exists and is not stale.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.validate(id).is_ok()
    }

    /// Validates that an id refers to a live entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for ids never allocated or in a free slot,
    /// and `StaleEntity` when the slot has since been reused.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let Some(slot) = self.slots.get(id.index as usize) else {
            return Err(Error::entity_not_found(id));
        };
        if slot.generation != id.generation {
            return Err(Error::stale_entity(id));
        }
        if slot.generation % 2 == 0 {
            return Err(Error::entity_not_found(id));
        }
        Ok(())
    }

    /// Gets a live entity.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::validate`].
    pub fn get(&self, id: EntityId) -> Result<&Entity> {
        self.validate(id)?;
        self.slots[id.index as usize]
            .entity
            .as_ref()
            .ok_or_else(|| Error::entity_not_found(id))
    }

    /// Gets a live entity for mutation.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::validate`].
    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.validate(id)?;
        self.slots[id.index as usize]
            .entity
            .as_mut()
            .ok_or_else(|| Error::entity_not_found(id))
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over live entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter().filter_map(|slot| slot.entity.as_ref())
    }
}
