//! Registry configuration.

/// Default limit on the length of the longest base chain of a class.
pub const DEFAULT_MAX_INHERITANCE_DEPTH: usize = 64;

/// Options applied to a [`ClassRegistry`](crate::ClassRegistry) at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Longest allowed chain of bases, counted in edges. Bounds the recursion
    /// depth of offset computation.
    pub max_inheritance_depth: usize,
    /// Number of classes to reserve space for.
    pub capacity: usize,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self {
            max_inheritance_depth: DEFAULT_MAX_INHERITANCE_DEPTH,
            capacity: 0,
        }
    }

    pub fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
