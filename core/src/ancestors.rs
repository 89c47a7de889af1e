//! Parent edges with visibility flags, and the searches built on them.
//!
//! `Ancestors` maps each item to the edges to its direct parents. Instances
//! are never mutated once shared: `add_element` and `merge` return a new map
//! and existing handles keep seeing the entries they had.

mod visibility;

pub use visibility::has_at_least_one_visible_parent_path;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use ancestry_proto::{AncestorEdge, AncestorItems, DocumentAncestors, ItemId};
use futures::future::join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::TraversalLimits;
use crate::error::AncestryError;
use crate::traversal::Exploration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ancestors {
    items: Arc<AncestorItems>,
}

impl Ancestors {
    pub fn new(items: AncestorItems) -> Self { Self { items: Arc::new(items) } }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn len(&self) -> usize { self.items.len() }

    /// A new instance with `item_id` mapped to `parents`; all other entries unchanged.
    pub fn add_element(&self, item_id: impl Into<ItemId>, parents: Vec<AncestorEdge>) -> Self {
        let mut items = AncestorItems::clone(&self.items);
        items.insert(item_id.into(), parents);
        Self::new(items)
    }

    /// Union of both instances. On a shared key the entry from `other` wins.
    pub fn merge(&self, other: &Ancestors) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut items = AncestorItems::clone(&self.items);
        for (item_id, parents) in other.items.iter() {
            items.insert(item_id.clone(), parents.clone());
        }
        Self::new(items)
    }

    /// Ids present here but absent from `other`.
    pub fn difference(&self, other: &Ancestors) -> Vec<ItemId> {
        self.items.keys().filter(|item_id| !other.has(item_id.as_str())).cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<&[AncestorEdge]> { self.items.get(key).map(Vec::as_slice) }

    /// Edges of every key, concatenated in key order. Unknown keys contribute nothing.
    pub fn multiget<I: AsRef<str>>(&self, keys: impl IntoIterator<Item = I>) -> Vec<AncestorEdge> {
        keys.into_iter().filter_map(|key| self.get(key.as_ref())).flatten().cloned().collect()
    }

    pub fn get_items(&self) -> &AncestorItems { &self.items }

    pub fn has(&self, key: &str) -> bool { self.items.contains_key(key) }

    pub fn keys(&self) -> impl Iterator<Item = &ItemId> + '_ { self.items.keys() }

    /// Every distinct edge across all keys, deduplicated by parent id.
    ///
    /// When one id shows up with different flags under different keys, the
    /// last occurrence (key order, then list order) supplies the flags, while
    /// the id keeps the position of its first occurrence.
    pub fn get_all_items_flat(&self) -> Vec<AncestorEdge> {
        let mut flat: IndexMap<&ItemId, &AncestorEdge> = IndexMap::new();
        for edge in self.items.values().flatten() {
            flat.insert(&edge.id, edge);
        }
        flat.into_values().cloned().collect()
    }

    /// Prunes the map to items that can still be seen.
    ///
    /// With `filter_hidden`, hidden edges are dropped from every list, and an
    /// item is only kept if some path from it to a root crosses no hidden edge.
    /// Without it, the map is returned as is.
    pub fn get_filtered_items(&self, filter_hidden: bool) -> AncestorItems {
        if !filter_hidden {
            return AncestorItems::clone(&self.items);
        }
        self.items
            .iter()
            .filter(|(item_id, _)| has_at_least_one_visible_parent_path(self, Exploration::from_item(*item_id)))
            .map(|(item_id, edges)| (item_id.clone(), edges.iter().filter(|edge| edge.is_visible()).cloned().collect()))
            .collect()
    }

    /// Same pruning as [`Ancestors::get_filtered_items`], flags dropped.
    pub fn to_document_ancestors(&self, filter_hidden: bool) -> DocumentAncestors {
        self.get_filtered_items(filter_hidden)
            .into_iter()
            .map(|(item_id, edges)| (item_id, edges.into_iter().map(|edge| edge.id).collect()))
            .collect()
    }

    /// Closest ancestor of `keys` for which `condition` resolves to `true`.
    ///
    /// Works one generation at a time: the condition runs concurrently for every
    /// parent edge of the current generation, all results are awaited, and the
    /// first matching edge by position wins. Otherwise the search moves on to the
    /// parents of this generation. A failing condition fails the whole search.
    pub async fn find_closest_parent<F, Fut>(&self, keys: &[ItemId], condition: F) -> Result<Option<AncestorEdge>, AncestryError>
    where
        F: Fn(ItemId) -> Fut,
        Fut: Future<Output = Result<bool, AncestryError>>,
    {
        self.find_closest_parent_with_limits(keys, condition, &TraversalLimits::default()).await
    }

    pub async fn find_closest_parent_with_limits<F, Fut>(
        &self,
        keys: &[ItemId],
        condition: F,
        limits: &TraversalLimits,
    ) -> Result<Option<AncestorEdge>, AncestryError>
    where
        F: Fn(ItemId) -> Fut,
        Fut: Future<Output = Result<bool, AncestryError>>,
    {
        let Some(origin) = keys.first().cloned() else {
            return Ok(None);
        };
        // Ids that already failed the condition; their parents are already scheduled.
        let mut evaluated: HashSet<ItemId> = HashSet::new();
        let mut generation: Vec<ItemId> = keys.to_vec();
        let mut depth = 0;

        loop {
            let candidates: Vec<AncestorEdge> =
                self.multiget(&generation).into_iter().filter(|edge| !evaluated.contains(&edge.id)).collect();
            if candidates.is_empty() {
                debug!("no parent of {} satisfies the condition ({} generations)", origin, depth);
                return Ok(None);
            }
            if depth >= limits.max_depth {
                warn!("closest parent search for {} exceeded depth {}", origin, limits.max_depth);
                return Err(AncestryError::DepthExceeded { item: origin, limit: limits.max_depth });
            }
            trace!("generation {} of {}: {} candidates", depth, origin, candidates.len());

            let results = join_all(candidates.iter().map(|edge| condition(edge.id.clone()))).await;
            let matches = results.into_iter().collect::<Result<Vec<bool>, AncestryError>>()?;
            if let Some(position) = matches.iter().position(|matched| *matched) {
                return Ok(Some(candidates[position].clone()));
            }

            generation = Vec::with_capacity(candidates.len());
            for edge in candidates {
                if evaluated.insert(edge.id.clone()) {
                    generation.push(edge.id);
                }
            }
            depth += 1;
        }
    }

    pub fn to_json(&self) -> Result<String, AncestryError> { Ok(serde_json::to_string(self)?) }

    pub fn from_json(json: &str) -> Result<Self, AncestryError> { Ok(serde_json::from_str(json)?) }
}

impl From<AncestorItems> for Ancestors {
    fn from(items: AncestorItems) -> Self { Self::new(items) }
}

impl FromIterator<(ItemId, Vec<AncestorEdge>)> for Ancestors {
    fn from_iter<T: IntoIterator<Item = (ItemId, Vec<AncestorEdge>)>>(iter: T) -> Self { Self::new(iter.into_iter().collect()) }
}
