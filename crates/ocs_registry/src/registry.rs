//! The registry: every table, the entity store, and the lifecycle cascades
//! that keep their indices consistent.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};
use ocs_foundation::{EntityId, EntityRef, Error, ErrorContext, Namespace, Result, Value};

use crate::bundle::Bundle;
use crate::component::Component;
use crate::config::RegistryConfig;
use crate::entity::{Entity, EntityStore};
use crate::environment::Environment;
use crate::singleton::Singleton;
use crate::table::Table;
use crate::tag::Tag;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`Registry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistryId(u64);

impl RegistryId {
    fn next() -> Self {
        Self(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Owns environments, components, entities, tags and singletons.
///
/// All declarations, lookups, bindings, queries and cascades go through one
/// registry value. It is single-threaded: builders, hooks and singleton
/// instances are reference counted with `Rc`.
#[derive(Debug)]
pub struct Registry {
    id: RegistryId,
    config: RegistryConfig,
    pub(crate) environments: Table<Environment>,
    pub(crate) entities: EntityStore,
    pub(crate) tags: Table<Tag>,
    singletons: Table<Singleton>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates a registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        let id = RegistryId::next();
        if config.announce {
            info!(
                "OCS initialized | v{} | id: {id}",
                env!("CARGO_PKG_VERSION")
            );
        }
        Self {
            id,
            config,
            environments: Table::new(Namespace::Environment),
            entities: EntityStore::new(),
            tags: Table::new(Namespace::Tag),
            singletons: Table::new(Namespace::Singleton),
        }
    }

    /// This registry's instance id.
    #[must_use]
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// The configuration the registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Context for an error raised while operating on one entity: the
    /// operation, then the environment and entity names, or the raw id when
    /// the handle is no longer live.
    pub(crate) fn entity_context(&self, operation: &str, entity: EntityId) -> ErrorContext {
        let context = ErrorContext::new().with_operation(operation);
        match self.entities.get(entity) {
            Ok(target) => context
                .with_segment(target.environment())
                .with_segment(target.name()),
            Err(_) => context.with_segment(entity.to_string()),
        }
    }

    // --- Environments ---

    /// Declares an environment with empty component and entity tables.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDeclaration` if the name is taken.
    pub fn declare_environment(&mut self, name: &str) -> Result<()> {
        let name: Arc<str> = name.into();
        self.environments
            .declare(Arc::clone(&name), Environment::new(Arc::clone(&name)))?;
        debug!("declared environment {name}");
        Ok(())
    }

    /// Looks up an environment.
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.lookup(name)
    }

    /// Environment names in declaration order.
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.names().map(|n| &**n)
    }

    // --- Components ---

    /// Declares a component in an environment.
    ///
    /// The builder must accept an empty parameter slice: removal calls it
    /// that way to recover the installed keys.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if the environment is missing, and
    /// `DuplicateDeclaration` if it already has a component with this name.
    pub fn declare_component<F>(&mut self, environment: &str, name: &str, builder: F) -> Result<()>
    where
        F: Fn(&[Value]) -> Bundle + 'static,
    {
        let target = self.environments.require_mut(environment)?;
        let name: Arc<str> = name.into();
        target.components.declare(
            Arc::clone(&name),
            Component::new(Arc::clone(&name), environment.into(), Rc::new(builder)),
        )?;
        debug!("declared component {name} in {environment}");
        Ok(())
    }

    /// Looks up a component.
    #[must_use]
    pub fn component(&self, environment: &str, name: &str) -> Option<&Component> {
        self.environments.lookup(environment)?.component(name)
    }

    /// Copies a component into another environment under the same name.
    ///
    /// The copy calls the same builder but starts with no entities.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if either environment or the source
    /// component is missing, and `DuplicateDeclaration` if the target
    /// environment already has a component with this name.
    pub fn duplicate_component(&mut self, source: &str, name: &str, target: &str) -> Result<()> {
        if !self.environments.contains(target) {
            return Err(Error::unknown(Namespace::Environment, target));
        }
        let builder = self
            .environments
            .require(source)?
            .components
            .require(name)?
            .builder();

        let destination = self.environments.require_mut(target)?;
        let name: Arc<str> = name.into();
        destination.components.declare(
            Arc::clone(&name),
            Component::new(Arc::clone(&name), target.into(), builder),
        )?;
        debug!("duplicated component {name} from {source} into {target}");
        Ok(())
    }

    /// Destroys a component: removes it from every entity carrying it, then
    /// from its environment.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if the environment or component is missing.
    /// The error's context names the operation, environment and component.
    pub fn destroy_component(&mut self, environment: &str, name: &str) -> Result<()> {
        self.destroy_component_members(environment, name).map_err(|err| {
            err.with_context(
                ErrorContext::new()
                    .with_operation("destroy_component")
                    .with_segment(environment)
                    .with_segment(name),
            )
        })
    }

    fn destroy_component_members(&mut self, environment: &str, name: &str) -> Result<()> {
        let members = self
            .environments
            .require(environment)?
            .components
            .require(name)?
            .members()
            .snapshot();

        for entity in &members {
            self.remove_component(*entity, name)?;
        }

        self.environments
            .require_mut(environment)?
            .components
            .remove(name);
        debug!(
            "destroyed component {name} in {environment} ({} entities detached)",
            members.len()
        );
        Ok(())
    }

    // --- Entities ---

    /// Declares an entity in an environment.
    ///
    /// `depth_limit` bounds how deep plain bundles are walked when wiring
    /// sub-bundles; `None` and `Some(0)` use the configured default.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if the environment is missing, and
    /// `DuplicateDeclaration` if the name is taken there.
    pub fn declare_entity(
        &mut self,
        environment: &str,
        name: &str,
        depth_limit: Option<usize>,
    ) -> Result<EntityId> {
        let target = self.environments.require_mut(environment)?;
        if target.entities.contains(name) {
            return Err(Error::duplicate_in(Namespace::Entity, name, environment));
        }

        let depth_limit = depth_limit
            .filter(|&limit| limit > 0)
            .unwrap_or(self.config.default_depth_limit);
        let env_name: Arc<str> = environment.into();
        let entity_name: Arc<str> = name.into();
        let id = self.entities.spawn(|id| {
            Entity::new(
                EntityRef::new(id, env_name, Arc::clone(&entity_name)),
                depth_limit,
            )
        });
        target.entities.declare(entity_name, id)?;

        debug!("declared entity {name} in {environment} as {id}");
        Ok(id)
    }

    /// Resolves an entity name within an environment.
    #[must_use]
    pub fn entity_id(&self, environment: &str, name: &str) -> Option<EntityId> {
        self.environments.lookup(environment)?.entity(name)
    }

    /// Gets a live entity.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` for destroyed handles and `EntityNotFound` for
    /// ids this registry never issued.
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Returns true if `id` refers to a live entity.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.entities.exists(id)
    }

    /// Number of live entities across all environments.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Destroys an entity.
    ///
    /// The entity is dropped from its environment and from every component
    /// and tag index; its id becomes stale. Installed properties are
    /// discarded with it rather than uninstalled.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<()> {
        let entity = self.entities.despawn(id)?;

        if let Some(environment) = self.environments.lookup_mut(entity.environment()) {
            environment.entities.remove(entity.name());
            for component in entity.component_names() {
                if let Some(component) = environment.components.lookup_mut(component) {
                    component.members_mut().remove(id);
                }
            }
        }
        for tag in entity.tag_names() {
            if let Some(tag) = self.tags.lookup_mut(tag) {
                tag.members_mut().remove(id);
            }
        }

        debug!(
            "destroyed entity {} in {}",
            entity.name(),
            entity.environment()
        );
        Ok(())
    }

    // --- Tags ---

    /// Declares a global tag.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDeclaration` if the name is taken.
    pub fn declare_tag(&mut self, name: &str) -> Result<()> {
        let name: Arc<str> = name.into();
        self.tags.declare(Arc::clone(&name), Tag::new(Arc::clone(&name)))?;
        debug!("declared tag {name}");
        Ok(())
    }

    /// Looks up a tag.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.lookup(name)
    }

    /// Tag names in declaration order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.names().map(|n| &**n)
    }

    /// Tags an entity. Tagging twice is a no-op.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles, and with `UnknownReference` for
    /// undeclared tags.
    pub fn add_tag(&mut self, entity: EntityId, tag: &str) -> Result<()> {
        let target = self.entities.get_mut(entity)?;
        let label = self.tags.require_mut(tag)?;

        label.members_mut().insert(entity);
        target.attach_tag(tag.into());
        Ok(())
    }

    /// Removes a tag from an entity.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles, and with `NotAttached` if the entity does
    /// not carry the tag.
    pub fn remove_tag(&mut self, entity: EntityId, tag: &str) -> Result<()> {
        let target = match self.entities.get_mut(entity) {
            Ok(target) => target,
            Err(err) => return Err(err.with_context(self.entity_context("remove_tag", entity))),
        };
        if !target.has_tag(tag) {
            let err = Error::not_attached(Namespace::Tag, tag, target.name());
            return Err(err.with_context(self.entity_context("remove_tag", entity)));
        }

        target.detach_tag(tag);
        if let Some(label) = self.tags.lookup_mut(tag) {
            label.members_mut().remove(entity);
        }
        Ok(())
    }

    /// Returns true if the entity is live and carries the tag.
    #[must_use]
    pub fn has_tag(&self, entity: EntityId, tag: &str) -> bool {
        self.entities.get(entity).is_ok_and(|e| e.has_tag(tag))
    }

    /// Destroys a tag: removes it from every entity carrying it, then from
    /// the tag table.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if the tag is missing.
    pub fn destroy_tag(&mut self, name: &str) -> Result<()> {
        let members = self
            .tags
            .require(name)
            .map_err(|err| {
                err.with_context(
                    ErrorContext::new()
                        .with_operation("destroy_tag")
                        .with_segment(name),
                )
            })?
            .members()
            .snapshot();
        for entity in members {
            self.remove_tag(entity, name)?;
        }
        self.tags.remove(name);
        debug!("destroyed tag {name}");
        Ok(())
    }

    // --- Singletons ---

    /// Declares a global singleton wrapping a shared instance.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDeclaration` if the name is taken.
    pub fn declare_singleton<T: Any>(&mut self, name: &str, instance: Rc<T>) -> Result<()> {
        let name: Arc<str> = name.into();
        self.singletons
            .declare(Arc::clone(&name), Singleton::new(Arc::clone(&name), instance))?;
        debug!("declared singleton {name}");
        Ok(())
    }

    /// Looks up a singleton.
    #[must_use]
    pub fn singleton(&self, name: &str) -> Option<&Singleton> {
        self.singletons.lookup(name)
    }

    /// Singleton names in declaration order.
    pub fn singleton_names(&self) -> impl Iterator<Item = &str> {
        self.singletons.names().map(|n| &**n)
    }

    /// Declares `new_name` as another entry for the instance behind `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if `name` is missing, and
    /// `DuplicateDeclaration` if `new_name` is taken.
    pub fn duplicate_singleton(&mut self, name: &str, new_name: &str) -> Result<()> {
        let new_name: Arc<str> = new_name.into();
        let copy = self.singletons.require(name)?.renamed(Arc::clone(&new_name));
        self.singletons.declare(Arc::clone(&new_name), copy)?;
        debug!("duplicated singleton {name} as {new_name}");
        Ok(())
    }

    /// Removes a singleton entry. The instance itself is left untouched, so
    /// other entries sharing it keep working.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if the singleton is missing.
    pub fn destroy_singleton(&mut self, name: &str) -> Result<()> {
        self.singletons
            .remove(name)
            .ok_or_else(|| Error::unknown(Namespace::Singleton, name))?;
        debug!("destroyed singleton {name}");
        Ok(())
    }
}
