pub mod ancestors;
pub mod builder;
pub mod config;
pub mod error;
pub mod traversal;
pub mod tree;
pub mod tree_builder;

pub use ancestors::{has_at_least_one_visible_parent_path, Ancestors};
pub use builder::{get_ancestors, get_ancestors_with_limits, CachingParentSource, MemoryParentSource, ParentSource, PrefetchingParentSource};
pub use config::TraversalLimits;
pub use error::AncestryError;
pub use traversal::{
    build_ancestors_list, build_ancestors_list_with_limits, build_ancestors_object, get_all_parents, get_all_paths_to_root_collection,
    get_all_paths_to_root_collection_with_limits, get_closest_ancestor_match, has_at_least_one_readable_parent_path, Exploration,
};
pub use tree::AncestorTree;
pub use tree_builder::{build_ancestor_tree, CollectionElement, CollectionSource, ElementKind};

pub use ancestry_proto as proto;
pub use ancestry_proto::{AncestorEdge, AncestorItems, DocumentAncestors, ItemId};

/// Builds a [`DocumentAncestors`] map from `item => [parents]` pairs, keeping the written order.
///
/// ```
/// use ancestry_core::{document_ancestors, ItemId};
///
/// let ancestors = document_ancestors! {
///     "doc" => ["col"],
///     "col" => [],
/// };
/// assert_eq!(ancestors["doc"], vec![ItemId::from("col")]);
/// ```
#[macro_export]
macro_rules! document_ancestors {
    ($($item:expr => [$($parent:expr),* $(,)?]),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::proto::DocumentAncestors::new();
        $(
            map.insert($crate::proto::ItemId::from($item), vec![$($crate::proto::ItemId::from($parent)),*]);
        )*
        map
    }};
}
