//! Binding engine: installs a component's bundle on an entity and removes it
//! again.
//!
//! Installing is all-or-nothing. Every check (handle, attachment, component
//! resolution, bundle shape, key collisions) runs before the entity or any
//! reverse index is touched.

use std::sync::Arc;

use log::{debug, trace};
use ocs_foundation::{EntityId, EntityRef, Error, ErrorKind, Namespace, Result, Value};

use crate::bundle::{Bundle, Node, PlainBundle};
use crate::config::CollisionPolicy;
use crate::entity::Entity;
use crate::property::Property;
use crate::registry::Registry;

impl Registry {
    /// Attaches a component to an entity, installing the keys its builder
    /// produces for `params`.
    ///
    /// # Errors
    ///
    /// - `StaleEntity` / `EntityNotFound` for invalid handles
    /// - `DuplicateDeclaration` if the component is already attached, or
    ///   (strict policy) if one of its keys is already exposed
    /// - `UnknownReference` if the entity's environment has no such component
    /// - `BundleShape` if the bundle declares a key twice
    ///
    /// Errors carry an [`ErrorContext`](ocs_foundation::ErrorContext) naming
    /// the operation, environment and entity.
    pub fn add_component(
        &mut self,
        entity: EntityId,
        component: &str,
        params: &[Value],
    ) -> Result<()> {
        self.bind(entity, component, params)
            .map_err(|err| err.with_context(self.entity_context("add_component", entity)))
    }

    fn bind(&mut self, entity: EntityId, component: &str, params: &[Value]) -> Result<()> {
        let policy = self.config().collision;
        let target = self.entities.get_mut(entity)?;
        if target.has_component(component) {
            return Err(Error::duplicate_in(
                Namespace::Component,
                component,
                target.name(),
            ));
        }
        let definition = self
            .environments
            .require_mut(target.environment())?
            .components
            .require_mut(component)?;

        let bundle = definition.build(params);
        if let Some(key) = bundle.duplicate_key() {
            return Err(Error::new(ErrorKind::BundleShape {
                component: component.to_string(),
                message: format!("key ({key}) is declared more than once"),
            }));
        }
        if policy == CollisionPolicy::Strict {
            let properties = target.properties();
            if let Some(key) = bundle.keys().into_iter().find(|key| properties.exposes(key)) {
                return Err(Error::duplicate_in(Namespace::Property, &*key, target.name()));
            }
        }

        debug!(
            "adding component {component} ({:?}) to {}",
            bundle.shape(),
            target.name()
        );
        install(target, bundle);
        target.attach_component(component.into());
        definition.members_mut().insert(entity);
        Ok(())
    }

    /// Detaches a component from an entity.
    ///
    /// Event and computed keys are left as inert stubs that read `Nil`;
    /// plain keys are deleted.
    ///
    /// # Errors
    ///
    /// Fails for invalid handles, with `UnknownReference` if the component
    /// is not declared, and with `NotAttached` if the entity does not carry
    /// it.
    pub fn remove_component(&mut self, entity: EntityId, component: &str) -> Result<()> {
        self.unbind(entity, component)
            .map_err(|err| err.with_context(self.entity_context("remove_component", entity)))
    }

    fn unbind(&mut self, entity: EntityId, component: &str) -> Result<()> {
        let target = self.entities.get_mut(entity)?;
        let definition = self
            .environments
            .require_mut(target.environment())?
            .components
            .require_mut(component)?;
        if !target.has_component(component) {
            return Err(Error::not_attached(
                Namespace::Component,
                component,
                target.name(),
            ));
        }

        debug!("removing component {component} from {}", target.name());
        uninstall(target, &definition.build(&[]));
        target.detach_component(component);
        definition.members_mut().remove(entity);
        Ok(())
    }

    /// Returns true if the entity is live and has the component attached.
    #[must_use]
    pub fn has_component(&self, entity: EntityId, component: &str) -> bool {
        self.entities
            .get(entity)
            .is_ok_and(|e| e.has_component(component))
    }
}

fn install(entity: &mut Entity, bundle: Bundle) {
    let owner = entity.handle().clone();
    let depth_limit = entity.depth_limit();
    let properties = entity.properties_mut();

    match bundle {
        Bundle::Event(bundle) => {
            bundle.attach(&owner);
            for key in bundle.keys() {
                properties.insert(
                    Arc::clone(key),
                    Property::Stored {
                        value: bundle.get(key),
                        hook: bundle.hook(),
                    },
                );
            }
        }
        Bundle::Computed(bundle) => {
            bundle.attach(&owner);
            for key in bundle.keys() {
                properties.insert(Arc::clone(key), Property::Computed { hook: bundle.hook() });
            }
        }
        Bundle::Plain(tree) => {
            wire(&tree, &owner, depth_limit);
            for (key, node) in tree.into_entries() {
                properties.insert(key, Property::Plain(node));
            }
        }
    }
}

fn uninstall(entity: &mut Entity, bundle: &Bundle) {
    let properties = entity.properties_mut();
    match bundle {
        Bundle::Event(_) | Bundle::Computed(_) => {
            for key in bundle.keys() {
                properties.stub(key);
            }
        }
        Bundle::Plain(tree) => {
            for key in tree.keys() {
                properties.remove(key);
            }
        }
    }
}

/// Points every event and computed sub-bundle of `root` at `owner`.
///
/// The root sits at depth 0; a node at depth `d` is reached only while
/// `d < limit`, so sub-bundles at or beyond the limit keep whatever owner
/// they had (detached for fresh bundles).
pub(crate) fn wire(root: &PlainBundle, owner: &EntityRef, limit: usize) {
    if limit == 0 {
        return;
    }

    let mut worklist: Vec<(&Node, usize)> = root
        .entries()
        .iter()
        .map(|(_, node)| (node, limit - 1))
        .collect();

    while let Some((node, remaining)) = worklist.pop() {
        if remaining == 0 {
            continue;
        }
        match node {
            Node::Leaf(_) => {}
            Node::Event(bundle) => {
                trace!("wiring event bundle {:?} to {owner:?}", bundle.keys());
                bundle.attach(owner);
            }
            Node::Computed(bundle) => {
                trace!("wiring computed bundle {:?} to {owner:?}", bundle.keys());
                bundle.attach(owner);
            }
            Node::Object(object) => {
                worklist.extend(
                    object
                        .entries()
                        .iter()
                        .map(|(_, child)| (child, remaining - 1)),
                );
            }
        }
    }
}
