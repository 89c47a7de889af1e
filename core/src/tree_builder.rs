//! Building an [`AncestorTree`] by walking an account's collections from its root.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use ancestry_proto::ItemId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::AncestryError;
use crate::tree::AncestorTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Document,
    Collection,
}

/// One entry of a collection's element list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionElement {
    pub key: ItemId,
    pub kind: ElementKind,
}

impl CollectionElement {
    pub fn document(key: impl Into<ItemId>) -> Self { Self { key: key.into(), kind: ElementKind::Document } }

    pub fn collection(key: impl Into<ItemId>) -> Self { Self { key: key.into(), kind: ElementKind::Collection } }
}

#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Elements of a collection, in display order. `None` when the collection does not exist.
    async fn elements(&self, collection_id: &ItemId) -> Result<Option<Vec<CollectionElement>>, AncestryError>;
}

#[async_trait]
impl<S: CollectionSource + ?Sized> CollectionSource for &S {
    async fn elements(&self, collection_id: &ItemId) -> Result<Option<Vec<CollectionElement>>, AncestryError> {
        (**self).elements(collection_id).await
    }
}

#[async_trait]
impl<S: CollectionSource + ?Sized> CollectionSource for Arc<S> {
    async fn elements(&self, collection_id: &ItemId) -> Result<Option<Vec<CollectionElement>>, AncestryError> {
        (**self).elements(collection_id).await
    }
}

/// Walks every collection reachable from `root_id`, breadth first, registering
/// each one as a parent of its elements.
///
/// A collection instanced under several parents is walked once, so the walk
/// terminates even if the collection data loops back on itself.
pub async fn build_ancestor_tree<S: CollectionSource + ?Sized>(source: &S, root_id: impl Into<ItemId>) -> Result<AncestorTree, AncestryError> {
    let root_id = root_id.into();
    let mut tree = AncestorTree::new();
    tree.add_root(root_id.clone());

    let mut walked: HashSet<ItemId> = HashSet::from([root_id.clone()]);
    let mut queue: VecDeque<ItemId> = VecDeque::from([root_id.clone()]);

    while let Some(collection_id) = queue.pop_front() {
        let Some(elements) = source.elements(&collection_id).await? else {
            trace!("collection {} not found, skipping", collection_id);
            continue;
        };
        tree.add_collection_by_ids(collection_id.clone(), elements.iter().map(|element| element.key.clone()));

        for element in elements {
            if element.kind == ElementKind::Collection && walked.insert(element.key.clone()) {
                queue.push_back(element.key);
            }
        }
    }

    debug!("built ancestor tree under {}: {} items, {} collections", root_id, tree.len(), walked.len());
    Ok(tree)
}
