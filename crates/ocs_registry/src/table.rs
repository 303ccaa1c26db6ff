//! Name-keyed tables and reverse-index membership sets.
//!
//! Every namespace in the registry is a [`Table`]: names are unique, lookups
//! never fail, and iteration follows declaration order. Reverse indices
//! (component → entities, tag → entities) are [`MemberSet`]s.

use std::collections::HashMap;
use std::sync::Arc;

use ocs_foundation::{EntityId, Error, Namespace, Result};

/// Insertion-ordered table of uniquely named values.
#[derive(Debug, Clone)]
pub struct Table<V> {
    namespace: Namespace,
    /// Enclosing environment name for per-environment tables.
    scope: Option<Arc<str>>,
    entries: HashMap<Arc<str>, V>,
    order: Vec<Arc<str>>,
}

impl<V> Table<V> {
    /// Creates an empty global table.
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            scope: None,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Creates an empty table scoped to an environment.
    #[must_use]
    pub fn scoped(namespace: Namespace, scope: Arc<str>) -> Self {
        Self {
            scope: Some(scope),
            ..Self::new(namespace)
        }
    }

    /// Declares a new entry.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDeclaration` if `name` is already taken.
    pub fn declare(&mut self, name: Arc<str>, value: V) -> Result<&mut V> {
        if self.entries.contains_key(&name) {
            return Err(self.duplicate(&name));
        }
        self.order.push(Arc::clone(&name));
        Ok(self.entries.entry(name).or_insert(value))
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    /// Looks up an entry by name for mutation.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries.get_mut(name)
    }

    /// Looks up an entry that must exist.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if `name` was never declared.
    pub fn require(&self, name: &str) -> Result<&V> {
        self.entries.get(name).ok_or_else(|| self.unknown(name))
    }

    /// Mutable variant of [`Table::require`].
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if `name` was never declared.
    pub fn require_mut(&mut self, name: &str) -> Result<&mut V> {
        let missing = self.unknown(name);
        self.entries.get_mut(name).ok_or(missing)
    }

    /// Returns true if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes an entry, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        let removed = self.entries.remove(name)?;
        self.order.retain(|n| &**n != name);
        Some(removed)
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.order.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn duplicate(&self, name: &str) -> Error {
        match &self.scope {
            Some(scope) => Error::duplicate_in(self.namespace, name, &**scope),
            None => Error::duplicate(self.namespace, name),
        }
    }

    fn unknown(&self, name: &str) -> Error {
        match &self.scope {
            Some(scope) => Error::unknown_in(self.namespace, name, &**scope),
            None => Error::unknown(self.namespace, name),
        }
    }
}

/// Insertion-ordered set of entities, used for reverse indices.
///
/// Cascades must iterate a [`MemberSet::snapshot`], never the live set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSet {
    members: Vec<EntityId>,
}

impl MemberSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member. Returns false if it was already present.
    pub fn insert(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members.push(id);
        true
    }

    /// Removes a member. Returns false if it was absent.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        self.members.len() != before
    }

    /// Returns true if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Members in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[EntityId] {
        &self.members
    }

    /// Copies the membership for iteration while the set is being mutated.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.members.clone()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
