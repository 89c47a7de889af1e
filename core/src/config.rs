use std::num::NonZeroUsize;

/// Deep enough for any real collection hierarchy, but bounded so corrupted
/// parent data fails instead of running away.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Upper bound on enumerated root paths for a single item.
pub const DEFAULT_MAX_PATHS: usize = 10_000;

/// Default number of items whose parents are kept by `CachingParentSource`.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Hard bounds applied by every traversal that could loop or explode on bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    /// Maximum number of generations (edges followed) from the starting item.
    /// `AncestorTree::is_descendent_of` counts depth-first stack frames instead.
    pub max_depth: usize,
    /// Maximum number of root paths enumerated for one item
    pub max_paths: usize,
}

impl TraversalLimits {
    pub fn new(max_depth: usize, max_paths: usize) -> Self { Self { max_depth, max_paths } }

    /// No bounds beyond cycle detection. Only for inputs known to be small.
    pub fn unbounded() -> Self { Self::new(usize::MAX, usize::MAX) }

    pub fn with_max_depth(self, max_depth: usize) -> Self { Self { max_depth, ..self } }

    pub fn with_max_paths(self, max_paths: usize) -> Self { Self { max_paths, ..self } }
}

impl Default for TraversalLimits {
    fn default() -> Self { Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS) }
}
