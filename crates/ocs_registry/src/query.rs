//! Queries over component reverse indices.

use ocs_foundation::{EntityId, Result};

use crate::registry::Registry;

/// One or more component names to match against.
///
/// Implemented for single names and for slices, arrays and vectors of
/// names, so both `"health"` and `&["health", "armor"]` are valid queries.
pub trait ComponentQuery {
    /// The component names, in query order.
    fn names(&self) -> Vec<&str>;
}

impl ComponentQuery for str {
    fn names(&self) -> Vec<&str> {
        vec![self]
    }
}

impl ComponentQuery for String {
    fn names(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl<S: AsRef<str>> ComponentQuery for [S] {
    fn names(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<S: AsRef<str>, const N: usize> ComponentQuery for [S; N] {
    fn names(&self) -> Vec<&str> {
        self.as_slice().names()
    }
}

impl<S: AsRef<str>> ComponentQuery for Vec<S> {
    fn names(&self) -> Vec<&str> {
        self.as_slice().names()
    }
}

impl Registry {
    /// Entities of an environment that have every queried component.
    ///
    /// Candidates come from the first component's index, in attachment
    /// order. An empty query matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` if the environment or the first queried
    /// component is not declared.
    pub fn get_all_with_components<Q>(&self, environment: &str, query: &Q) -> Result<Vec<EntityId>>
    where
        Q: ComponentQuery + ?Sized,
    {
        let scope = self.environments.require(environment)?;
        let names = query.names();
        let Some((first, rest)) = names.split_first() else {
            return Ok(Vec::new());
        };

        let candidates = scope.components.require(first)?.entities();
        Ok(candidates
            .iter()
            .copied()
            .filter(|id| rest.iter().rev().all(|name| self.has_component(*id, name)))
            .collect())
    }

    /// Names of the entities [`Registry::get_all_with_components`] returns,
    /// in the same order.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::get_all_with_components`].
    pub fn get_all_names_with_components<Q>(
        &self,
        environment: &str,
        query: &Q,
    ) -> Result<Vec<String>>
    where
        Q: ComponentQuery + ?Sized,
    {
        self.get_all_with_components(environment, query)?
            .into_iter()
            .map(|id| Ok(self.entity(id)?.name().to_string()))
            .collect()
    }
}
