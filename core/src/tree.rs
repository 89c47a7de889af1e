//! Set-valued parent index for "is A somewhere under B" questions.
//!
//! Built once by walking an account's collections, then read-only. It can be
//! serialized to `{ itemId: [parentIds...] }` for caching or transport and
//! rebuilt on the other side.

use std::collections::HashSet;

use ancestry_proto::{DocumentAncestors, ItemId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TraversalLimits;
use crate::error::AncestryError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AncestorTree {
    parents: IndexMap<ItemId, IndexSet<ItemId>>,
}

impl AncestorTree {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.parents.len() }

    pub fn is_empty(&self) -> bool { self.parents.is_empty() }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> + '_ { self.parents.keys() }

    pub fn get_direct_parents(&self, id: &str) -> Option<&IndexSet<ItemId>> { self.parents.get(id) }

    /// Register `id` as a root, unless it is already known.
    pub fn add_root(&mut self, id: impl Into<ItemId>) { self.parents.entry(id.into()).or_default(); }

    /// Record `collection_id` as a parent of each child. Repeating a pair is a no-op.
    pub fn add_collection_by_ids<I: Into<ItemId>>(&mut self, collection_id: impl Into<ItemId>, child_keys: impl IntoIterator<Item = I>) {
        let collection_id = collection_id.into();
        for child in child_keys {
            self.parents.entry(child.into()).or_default().insert(collection_id.clone());
        }
    }

    /// Whether `ancestor_id` is reachable from `item_id` by following parent links.
    ///
    /// An item is not its own descendent. Unknown items descend from nothing.
    /// A cycle only fails the check when `ancestor_id` is not reachable at all.
    pub fn is_descendent_of(&self, item_id: &str, ancestor_id: &str) -> Result<bool, AncestryError> {
        self.is_descendent_of_with_limits(item_id, ancestor_id, &TraversalLimits::default())
    }

    pub fn is_descendent_of_with_limits(&self, item_id: &str, ancestor_id: &str, limits: &TraversalLimits) -> Result<bool, AncestryError> {
        let Some((start, _)) = self.parents.get_key_value(item_id) else {
            return Ok(false);
        };

        // Depth-first over (node, index of the next parent to visit). Nodes on the
        // stack form the current path; reaching one of them again means a cycle.
        let mut stack: Vec<(&ItemId, usize)> = vec![(start, 0)];
        let mut on_path: HashSet<&ItemId> = HashSet::from([start]);
        let mut exhausted: HashSet<&ItemId> = HashSet::new();
        let mut cycle: Option<AncestryError> = None;

        while let Some(&(node, index)) = stack.last() {
            let parents = self.parents.get(node);
            // Direct parents first, so a bad branch listed earlier cannot hide them
            if index == 0 && parents.is_some_and(|parents| parents.contains(ancestor_id)) {
                return Ok(true);
            }
            let Some(parent) = parents.and_then(|parents| parents.get_index(index)) else {
                stack.pop();
                on_path.remove(node);
                exhausted.insert(node);
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            if on_path.contains(parent) {
                if cycle.is_none() {
                    warn!("cyclic ancestry while checking {} under {}: {} -> {}", item_id, ancestor_id, node, parent);
                    cycle = Some(AncestryError::CyclicAncestry { item: parent.clone(), via: node.clone() });
                }
                continue;
            }
            if exhausted.contains(parent) {
                continue;
            }
            if stack.len() >= limits.max_depth {
                return Err(AncestryError::DepthExceeded { item: start.clone(), limit: limits.max_depth });
            }
            stack.push((parent, 0));
            on_path.insert(parent);
        }
        cycle.map_or(Ok(false), Err)
    }

    /// Whether `item_id` is one of `candidates` or sits anywhere below one of them.
    pub fn is_self_or_descendent_of_any<I: AsRef<str>>(&self, item_id: &str, candidates: impl IntoIterator<Item = I>) -> Result<bool, AncestryError> {
        for candidate in candidates {
            let candidate = candidate.as_ref();
            if candidate == item_id || self.is_descendent_of(item_id, candidate)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Array-valued form, in insertion order.
    pub fn to_document_ancestors(&self) -> DocumentAncestors {
        self.parents.iter().map(|(id, parents)| (id.clone(), parents.iter().cloned().collect())).collect()
    }

    pub fn to_json(&self) -> Result<String, AncestryError> { Ok(serde_json::to_string(self)?) }

    pub fn from_json(json: &str) -> Result<Self, AncestryError> { Ok(serde_json::from_str(json)?) }
}

impl From<DocumentAncestors> for AncestorTree {
    fn from(ancestors: DocumentAncestors) -> Self {
        Self { parents: ancestors.into_iter().map(|(id, parents)| (id, parents.into_iter().collect())).collect() }
    }
}

impl From<&AncestorTree> for DocumentAncestors {
    fn from(tree: &AncestorTree) -> Self { tree.to_document_ancestors() }
}
