//! Singletons: named handles to shared instances.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A global entry pointing at a shared instance of any type.
///
/// Several entries may share one instance (see
/// [`Registry::duplicate_singleton`](crate::Registry::duplicate_singleton)).
#[derive(Clone)]
pub struct Singleton {
    name: Arc<str>,
    instance: Rc<dyn Any>,
}

impl Singleton {
    pub(crate) fn new(name: Arc<str>, instance: Rc<dyn Any>) -> Self {
        Self { name, instance }
    }

    /// The entry's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared instance.
    #[must_use]
    pub fn instance(&self) -> Rc<dyn Any> {
        Rc::clone(&self.instance)
    }

    /// The shared instance as a concrete type, if it is one.
    #[must_use]
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.instance).downcast::<T>().ok()
    }

    /// Returns true if both entries point at the same instance.
    #[must_use]
    pub fn shares_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.instance, &other.instance)
    }

    pub(crate) fn renamed(&self, name: Arc<str>) -> Self {
        Self {
            name,
            instance: Rc::clone(&self.instance),
        }
    }
}

impl fmt::Debug for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
