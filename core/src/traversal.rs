//! Traversal helpers over plain parent-id maps (`DocumentAncestors`).
//!
//! ## Shape of the data
//!
//! Every entry maps an item to the ordered ids of its direct parents. An empty
//! list marks a root. Because items can be instanced into several collections,
//! the relation is a DAG and an item may reach the root along several paths:
//!
//! ```text
//!        root
//!       ↙    ↘
//!      A      B
//!       ↘    ↙
//!         X        X => [A, B]
//! ```
//!
//! None of these helpers treat an unknown id as an error. They return `false`,
//! `None` or an empty result instead. The ones that walk unbounded chains fail
//! with `AncestryError::CyclicAncestry` when the data loops back on itself.

use std::collections::{HashSet, VecDeque};

use ancestry_proto::{DocumentAncestors, ItemId};
use tracing::{trace, warn};

use crate::config::TraversalLimits;
use crate::error::AncestryError;

/// Breadth-first work queue for the closest-match searches.
///
/// Consumed by value, so a queue that has been drained once cannot be handed
/// to a second search by accident.
#[derive(Debug, Clone, Default)]
pub struct Exploration {
    to_explore: VecDeque<ItemId>,
    explored: HashSet<ItemId>,
}

impl Exploration {
    pub fn new<I: Into<ItemId>>(start: impl IntoIterator<Item = I>) -> Self {
        Self { to_explore: start.into_iter().map(Into::into).collect(), explored: HashSet::new() }
    }

    /// Start from a single item.
    pub fn from_item(item_id: impl Into<ItemId>) -> Self { Self::new([item_id.into()]) }

    /// Treat `ids` as already explored: their parents will not be expanded.
    pub fn with_explored<I: Into<ItemId>>(mut self, ids: impl IntoIterator<Item = I>) -> Self {
        self.explored.extend(ids.into_iter().map(Into::into));
        self
    }

    pub(crate) fn next(&mut self) -> Option<ItemId> { self.to_explore.pop_front() }

    pub(crate) fn push(&mut self, ids: impl IntoIterator<Item = ItemId>) { self.to_explore.extend(ids); }

    pub(crate) fn is_explored(&self, id: &ItemId) -> bool { self.explored.contains(id) }

    pub(crate) fn mark_explored(&mut self, id: ItemId) { self.explored.insert(id); }
}

/// Breadth-first search for the closest item satisfying `predicate`, starting
/// with the exploration's own start items (distance 0).
///
/// The predicate runs before the explored check, so an item reached again along
/// a second branch can still match. Only expansion is deduplicated, which also
/// makes the search terminate on cyclic input.
pub fn get_closest_ancestor_match<F>(ancestors: &DocumentAncestors, mut exploration: Exploration, mut predicate: F) -> Option<ItemId>
where F: FnMut(&ItemId) -> bool {
    while let Some(candidate) = exploration.next() {
        if predicate(&candidate) {
            trace!("closest ancestor match: {}", candidate);
            return Some(candidate);
        }
        if exploration.is_explored(&candidate) {
            continue;
        }
        if let Some(parents) = ancestors.get(&candidate) {
            exploration.push(parents.iter().cloned());
        }
        exploration.mark_explored(candidate);
    }
    None
}

/// Whether any item on the way up (start items included) is in `readable_items`.
pub fn has_at_least_one_readable_parent_path(
    ancestors: &DocumentAncestors,
    exploration: Exploration,
    readable_items: &HashSet<ItemId>,
) -> bool {
    if readable_items.is_empty() {
        return false;
    }
    get_closest_ancestor_match(ancestors, exploration, |candidate| readable_items.contains(candidate)).is_some()
}

/// Follows the first parent of each item up to a root.
///
/// Returns the chain nearest parent first, without `item_id` itself. Other
/// parents of instanced items are ignored: this yields one stable path, not a
/// complete one. See [`get_all_paths_to_root_collection`] for that.
pub fn build_ancestors_list(item_id: &str, ancestors: &DocumentAncestors) -> Result<Vec<ItemId>, AncestryError> {
    build_ancestors_list_with_limits(item_id, ancestors, &TraversalLimits::default())
}

pub fn build_ancestors_list_with_limits(
    item_id: &str,
    ancestors: &DocumentAncestors,
    limits: &TraversalLimits,
) -> Result<Vec<ItemId>, AncestryError> {
    let mut list: Vec<ItemId> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([item_id]);
    let mut current = item_id;

    while let Some(parent) = ancestors.get(current).and_then(|parents| parents.first()) {
        if !seen.insert(parent.as_str()) {
            warn!("cycle in first-parent chain of {} at {}", item_id, parent);
            return Err(AncestryError::CyclicAncestry { item: parent.clone(), via: current.into() });
        }
        if list.len() >= limits.max_depth {
            return Err(AncestryError::DepthExceeded { item: item_id.into(), limit: limits.max_depth });
        }
        list.push(parent.clone());
        current = parent.as_str();
    }
    Ok(list)
}

/// [`build_ancestors_list`] for each id, keyed by that id.
pub fn build_ancestors_object<I: AsRef<str>>(
    item_ids: impl IntoIterator<Item = I>,
    ancestors: &DocumentAncestors,
) -> Result<DocumentAncestors, AncestryError> {
    item_ids
        .into_iter()
        .map(|item_id| -> Result<(ItemId, Vec<ItemId>), AncestryError> {
            let item_id = item_id.as_ref();
            Ok((ItemId::from(item_id), build_ancestors_list(item_id, ancestors)?))
        })
        .collect()
}

/// Enumerates every path from a root down to `item_id`.
///
/// Each path starts at a root and ends with `item_id`. An item absent from
/// `ancestors` counts as its own root, giving `[[item_id]]`.
pub fn get_all_paths_to_root_collection(item_id: &str, ancestors: &DocumentAncestors) -> Result<Vec<Vec<ItemId>>, AncestryError> {
    get_all_paths_to_root_collection_with_limits(item_id, ancestors, &TraversalLimits::default())
}

pub fn get_all_paths_to_root_collection_with_limits(
    item_id: &str,
    ancestors: &DocumentAncestors,
    limits: &TraversalLimits,
) -> Result<Vec<Vec<ItemId>>, AncestryError> {
    // Paths are grown item-first; the last element is the head still being extended.
    let mut paths: Vec<Vec<ItemId>> = vec![vec![ItemId::from(item_id)]];
    let mut rounds = 0;

    loop {
        let mut extended = false;
        let mut branches = Vec::new();

        for path in paths.iter_mut() {
            let parents = match path.last().and_then(|head| ancestors.get(head)) {
                Some(parents) if !parents.is_empty() => parents,
                _ => continue,
            };
            if let Some(parent) = parents.iter().find(|parent| path.contains(parent)) {
                let via = path.last().cloned().unwrap_or_else(|| ItemId::from(item_id));
                warn!("cycle in ancestry of {} at {}", item_id, parent);
                return Err(AncestryError::CyclicAncestry { item: parent.clone(), via });
            }
            for parent in &parents[1..] {
                let mut branch = path.clone();
                branch.push(parent.clone());
                branches.push(branch);
            }
            path.push(parents[0].clone());
            extended = true;
        }

        paths.extend(branches);
        if paths.len() > limits.max_paths {
            return Err(AncestryError::TooManyPaths { item: item_id.into(), limit: limits.max_paths });
        }
        if !extended {
            break;
        }
        rounds += 1;
        if rounds > limits.max_depth {
            return Err(AncestryError::DepthExceeded { item: item_id.into(), limit: limits.max_depth });
        }
    }
    trace!("{} paths to root for {} after {} rounds", paths.len(), item_id, rounds);

    let mut seen = HashSet::new();
    Ok(paths
        .into_iter()
        .map(|mut path| {
            path.reverse();
            path
        })
        .filter(|path| seen.insert(path.clone()))
        .collect())
}

/// Every distinct ancestor of `item_id`, nearest first, excluding the item itself.
pub fn get_all_parents(item_id: &str, ancestors: &DocumentAncestors) -> Vec<ItemId> {
    let mut result = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([item_id]);
    let mut queue: VecDeque<&str> = VecDeque::from([item_id]);

    while let Some(current) = queue.pop_front() {
        for parent in ancestors.get(current).into_iter().flatten() {
            if seen.insert(parent.as_str()) {
                result.push(parent.clone());
                queue.push_back(parent.as_str());
            }
        }
    }
    result
}
