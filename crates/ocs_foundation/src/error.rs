//! Error types for OCS.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// Result alias used throughout OCS.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for OCS operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a duplicate declaration error for a global name.
    #[must_use]
    pub fn duplicate(namespace: Namespace, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateDeclaration {
            namespace,
            name: name.into(),
            scope: None,
        })
    }

    /// Creates a duplicate declaration error for a name inside a scope
    /// (an environment, or an entity for property keys).
    #[must_use]
    pub fn duplicate_in(
        namespace: Namespace,
        name: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DuplicateDeclaration {
            namespace,
            name: name.into(),
            scope: Some(scope.into()),
        })
    }

    /// Creates an unknown reference error for a global name.
    #[must_use]
    pub fn unknown(namespace: Namespace, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownReference {
            namespace,
            name: name.into(),
            scope: None,
        })
    }

    /// Creates an unknown reference error for a name inside a scope.
    #[must_use]
    pub fn unknown_in(
        namespace: Namespace,
        name: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnknownReference {
            namespace,
            name: name.into(),
            scope: Some(scope.into()),
        })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates an error for a component or tag the entity does not carry.
    #[must_use]
    pub fn not_attached(
        namespace: Namespace,
        name: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::NotAttached {
            namespace,
            name: name.into(),
            entity: entity.into(),
        })
    }

    /// Creates a read-only property error.
    #[must_use]
    pub fn read_only(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReadOnlyProperty { key: key.into() })
    }

    /// Returns true for [`ErrorKind::DuplicateDeclaration`].
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, ErrorKind::DuplicateDeclaration { .. })
    }

    /// Returns true for [`ErrorKind::UnknownReference`].
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownReference { .. })
    }

    /// Returns true for [`ErrorKind::NotAttached`].
    #[must_use]
    pub fn is_not_attached(&self) -> bool {
        matches!(self.kind, ErrorKind::NotAttached { .. })
    }
}

/// The namespace a name was declared or looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Global environment table.
    Environment,
    /// Per-environment component table.
    Component,
    /// Per-environment entity table.
    Entity,
    /// Global tag table.
    Tag,
    /// Global singleton table.
    Singleton,
    /// Property keys on a single entity.
    Property,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Environment => "environment",
            Self::Component => "component",
            Self::Entity => "entity",
            Self::Tag => "tag",
            Self::Singleton => "singleton",
            Self::Property => "key",
        };
        f.write_str(name)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A name was declared twice in the same namespace.
    #[error("{namespace} ({name}){} has already been declared", scope_suffix(.scope.as_deref()))]
    DuplicateDeclaration {
        /// Namespace of the clashing name.
        namespace: Namespace,
        /// The clashing name.
        name: String,
        /// Enclosing environment or entity, if the namespace is scoped.
        scope: Option<String>,
    },

    /// A name that must exist was never declared.
    #[error("{namespace} ({name}) has not been declared{}", scope_suffix(.scope.as_deref()))]
    UnknownReference {
        /// Namespace that was searched.
        namespace: Namespace,
        /// The missing name.
        name: String,
        /// Enclosing environment or entity, if the namespace is scoped.
        scope: Option<String>,
    },

    /// Removing a component or tag the entity does not carry.
    #[error("entity ({entity}) does not have {namespace} ({name})")]
    NotAttached {
        /// `Component` or `Tag`.
        namespace: Namespace,
        /// The missing component or tag.
        name: String,
        /// Name of the entity.
        entity: String,
    },

    /// Entity was not found in storage.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity reference is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Write to a computed key.
    #[error("key ({key}) is computed and cannot be written")]
    ReadOnlyProperty {
        /// The computed key.
        key: String,
    },

    /// Plain read of a key holding a nested node.
    #[error("key ({key}) holds a nested node, not a value")]
    CompositeProperty {
        /// The composite key.
        key: String,
    },

    /// Builder output whose key set cannot be determined.
    #[error("component ({component}) produced an invalid bundle: {message}")]
    BundleShape {
        /// Component whose builder produced the bundle.
        component: String,
        /// What is wrong with it.
        message: String,
    },
}

fn scope_suffix(scope: Option<&str>) -> String {
    scope.map(|s| format!(" in ({s})")).unwrap_or_default()
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed, e.g. `add_component`.
    pub operation: Option<String>,
    /// Chain of names leading to the failure, outermost first.
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Appends a path segment.
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if !self.path.is_empty() {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at {}", self.path.join("/"))?;
        }
        Ok(())
    }
}
