//! Configuration for a registry.

/// What happens when a component installs a key the entity already exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Fail with `DuplicateDeclaration` before writing any key, and reject
    /// writes to computed keys.
    #[default]
    Strict,
    /// Overwrite existing keys, and silently ignore writes to computed keys.
    Permissive,
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Collision and read-only handling.
    pub collision: CollisionPolicy,

    /// Traversal depth used by entities declared without an explicit limit.
    pub default_depth_limit: usize,

    /// Emit the one-line identification notice when the registry is built.
    pub announce: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::Strict,
            default_depth_limit: 2,
            announce: true,
        }
    }
}

impl RegistryConfig {
    /// Strict collision handling with default depth.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Permissive collision handling with default depth.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            collision: CollisionPolicy::Permissive,
            ..Self::default()
        }
    }

    /// Builder method to set the collision policy.
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Builder method to set the default traversal depth.
    #[must_use]
    pub fn with_default_depth_limit(mut self, depth: usize) -> Self {
        self.default_depth_limit = depth;
        self
    }

    /// Builder method to enable/disable the startup notice.
    #[must_use]
    pub fn with_announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    /// Returns true under [`CollisionPolicy::Strict`].
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.collision == CollisionPolicy::Strict
    }
}
