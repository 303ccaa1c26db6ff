//! Builder protocol: what a component's builder returns.
//!
//! A builder is a function of caller-supplied parameters returning a
//! [`Bundle`]. The bundle's shape is fixed where the builder is written:
//!
//! - [`EventBundle`]: keys with stored values and a write hook
//! - [`ComputedBundle`]: keys whose every read calls a read hook
//! - [`PlainBundle`]: an ordered tree of plain values, nested objects, and
//!   event/computed sub-bundles
//!
//! Builders are also called with an empty parameter slice when a component
//! is removed, to recover the declared keys. Every builder must accept `&[]`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use ocs_foundation::{EntityRef, Value};

/// Hook invoked after a key of an event bundle is written.
///
/// Receives the owning entity, the key, and the new value. A non-nil result
/// triggers a re-write of the same value.
pub type WriteHook = Rc<dyn Fn(&EntityRef, &str, &Value) -> Value>;

/// Hook computing the value of a key of a computed bundle.
pub type ReadHook = Rc<dyn Fn(&EntityRef, &str) -> Value>;

/// A component's builder function.
pub type Builder = Rc<dyn Fn(&[Value]) -> Bundle>;

/// Stores `value`, calls the hook, and stores the same value again when the
/// hook returns something other than `Nil`.
pub(crate) fn write_through(
    hook: &WriteHook,
    owner: &EntityRef,
    key: &str,
    value: Value,
    mut store: impl FnMut(Value),
) {
    store(value.clone());
    if !hook(owner, key, &value).is_nil() {
        store(value);
    }
}

/// Output of a builder.
#[derive(Clone, Debug)]
pub enum Bundle {
    /// Stored keys with a write hook.
    Event(EventBundle),
    /// Computed, read-only keys.
    Computed(ComputedBundle),
    /// Plain nested tree.
    Plain(PlainBundle),
}

/// Discriminant of a [`Bundle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// [`Bundle::Event`].
    Event,
    /// [`Bundle::Computed`].
    Computed,
    /// [`Bundle::Plain`].
    Plain,
}

impl Bundle {
    /// The shape of this bundle.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Event(_) => Shape::Event,
            Self::Computed(_) => Shape::Computed,
            Self::Plain(_) => Shape::Plain,
        }
    }

    /// Top-level keys this bundle installs, in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<Arc<str>> {
        match self {
            Self::Event(bundle) => bundle.keys().to_vec(),
            Self::Computed(bundle) => bundle.keys().to_vec(),
            Self::Plain(bundle) => bundle.keys().cloned().collect(),
        }
    }

    /// The first key declared more than once, if any.
    #[must_use]
    pub fn duplicate_key(&self) -> Option<Arc<str>> {
        let keys = self.keys();
        keys.iter()
            .enumerate()
            .find(|(i, key)| keys[..*i].contains(*key))
            .map(|(_, key)| Arc::clone(key))
    }
}

impl From<EventBundle> for Bundle {
    fn from(bundle: EventBundle) -> Self {
        Self::Event(bundle)
    }
}

impl From<ComputedBundle> for Bundle {
    fn from(bundle: ComputedBundle) -> Self {
        Self::Computed(bundle)
    }
}

impl From<PlainBundle> for Bundle {
    fn from(bundle: PlainBundle) -> Self {
        Self::Plain(bundle)
    }
}

// =============================================================================
// Event bundles
// =============================================================================

struct EventState {
    keys: Vec<Arc<str>>,
    store: RefCell<HashMap<Arc<str>, Value>>,
    on_write: WriteHook,
    owner: RefCell<EntityRef>,
}

/// Keys with stored values and a write hook.
///
/// Cloning shares the store and the owner back-reference.
#[derive(Clone)]
pub struct EventBundle(Rc<EventState>);

impl EventBundle {
    /// Creates a bundle from initial key/value pairs and a write hook.
    pub fn new<K, V, I, F>(initial: I, on_write: F) -> Self
    where
        K: Into<Arc<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
        F: Fn(&EntityRef, &str, &Value) -> Value + 'static,
    {
        let mut keys = Vec::new();
        let mut store = HashMap::new();
        for (key, value) in initial {
            let key = key.into();
            keys.push(Arc::clone(&key));
            store.insert(key, value.into());
        }
        Self(Rc::new(EventState {
            keys,
            store: RefCell::new(store),
            on_write: Rc::new(on_write),
            owner: RefCell::new(EntityRef::detached()),
        }))
    }

    /// Declared keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> &[Arc<str>] {
        &self.0.keys
    }

    /// Returns true if `key` is declared.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.0.keys.iter().any(|k| &**k == key)
    }

    /// Reads the last stored value of `key` (`Nil` if undeclared).
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.0.store.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Writes `key` and runs the write hook against the current owner.
    ///
    /// Returns false (and writes nothing) if `key` is not declared.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let Some(key) = self.0.keys.iter().find(|k| &***k == key).cloned() else {
            return false;
        };
        let owner = self.owner();
        write_through(&self.0.on_write, &owner, &key, value.into(), |v| {
            self.0.store.borrow_mut().insert(Arc::clone(&key), v);
        });
        true
    }

    /// The entity this bundle was last wired to.
    #[must_use]
    pub fn owner(&self) -> EntityRef {
        self.0.owner.borrow().clone()
    }

    /// The write hook.
    #[must_use]
    pub fn hook(&self) -> WriteHook {
        Rc::clone(&self.0.on_write)
    }

    /// Returns true if both handles share one bundle.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn attach(&self, owner: &EntityRef) {
        *self.0.owner.borrow_mut() = owner.clone();
    }
}

impl fmt::Debug for EventBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBundle")
            .field("keys", &self.0.keys)
            .field("owner", &*self.0.owner.borrow())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Computed bundles
// =============================================================================

struct ComputedState {
    keys: Vec<Arc<str>>,
    on_read: ReadHook,
    owner: RefCell<EntityRef>,
}

/// Read-only keys whose value is recomputed on every read.
#[derive(Clone)]
pub struct ComputedBundle(Rc<ComputedState>);

impl ComputedBundle {
    /// Creates a bundle from its keys and a read hook.
    pub fn new<K, I, F>(keys: I, on_read: F) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = K>,
        F: Fn(&EntityRef, &str) -> Value + 'static,
    {
        Self(Rc::new(ComputedState {
            keys: keys.into_iter().map(Into::into).collect(),
            on_read: Rc::new(on_read),
            owner: RefCell::new(EntityRef::detached()),
        }))
    }

    /// Declared keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> &[Arc<str>] {
        &self.0.keys
    }

    /// Returns true if `key` is declared.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.0.keys.iter().any(|k| &**k == key)
    }

    /// Computes `key` for the current owner (`Nil` if undeclared).
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        if !self.declares(key) {
            return Value::Nil;
        }
        (self.0.on_read)(&self.owner(), key)
    }

    /// The entity this bundle was last wired to.
    #[must_use]
    pub fn owner(&self) -> EntityRef {
        self.0.owner.borrow().clone()
    }

    /// The read hook.
    #[must_use]
    pub fn hook(&self) -> ReadHook {
        Rc::clone(&self.0.on_read)
    }

    /// Returns true if both handles share one bundle.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn attach(&self, owner: &EntityRef) {
        *self.0.owner.borrow_mut() = owner.clone();
    }
}

impl fmt::Debug for ComputedBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedBundle")
            .field("keys", &self.0.keys)
            .field("owner", &*self.0.owner.borrow())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Plain bundles
// =============================================================================

/// A node of a plain bundle tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// A plain value.
    Leaf(Value),
    /// A nested object.
    Object(PlainBundle),
    /// An event bundle nested in the tree.
    Event(EventBundle),
    /// A computed bundle nested in the tree.
    Computed(ComputedBundle),
}

impl Node {
    /// Returns true for nodes the binding traversal descends into.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        !matches!(self, Self::Leaf(_))
    }

    /// The plain value, if this is a leaf.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            _ => None,
        }
    }

    /// The nested object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&PlainBundle> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The event bundle, if this is one.
    #[must_use]
    pub fn as_event(&self) -> Option<&EventBundle> {
        match self {
            Self::Event(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// The computed bundle, if this is one.
    #[must_use]
    pub fn as_computed(&self) -> Option<&ComputedBundle> {
        match self {
            Self::Computed(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// Reads a member key: object leaves, event store, or computed hook.
    ///
    /// Returns `Nil` for leaves, nested composites, and unknown keys.
    #[must_use]
    pub fn read(&self, key: &str) -> Value {
        match self {
            Self::Leaf(_) => Value::Nil,
            Self::Object(object) => object
                .get(key)
                .and_then(Node::as_value)
                .cloned()
                .unwrap_or_default(),
            Self::Event(bundle) => bundle.get(key),
            Self::Computed(bundle) => bundle.get(key),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Leaf(value)
    }
}

impl From<PlainBundle> for Node {
    fn from(object: PlainBundle) -> Self {
        Self::Object(object)
    }
}

impl From<EventBundle> for Node {
    fn from(bundle: EventBundle) -> Self {
        Self::Event(bundle)
    }
}

impl From<ComputedBundle> for Node {
    fn from(bundle: ComputedBundle) -> Self {
        Self::Computed(bundle)
    }
}

/// Ordered key → node tree.
///
/// Used both as a builder's top-level plain output and as a nested object.
#[derive(Clone, Debug, Default)]
pub struct PlainBundle {
    entries: Vec<(Arc<str>, Node)>,
}

impl PlainBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method adding a node.
    #[must_use]
    pub fn with(mut self, key: impl Into<Arc<str>>, node: impl Into<Node>) -> Self {
        self.entries.push((key.into(), node.into()));
        self
    }

    /// Builder method adding a plain value.
    #[must_use]
    pub fn with_value(self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.with(key, Node::Leaf(value.into()))
    }

    /// The node stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, node)| node)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[(Arc<str>, Node)] {
        &self.entries
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(Arc<str>, Node)> {
        self.entries
    }
}
