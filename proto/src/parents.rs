use indexmap::IndexMap;

use crate::{edge::AncestorEdge, error::DecodeError, id::ItemId};

/// Item id to ordered direct-parent ids. An empty list marks a root.
///
/// Key order is insertion order, and is preserved on the wire.
pub type DocumentAncestors = IndexMap<ItemId, Vec<ItemId>>;

/// Item id to ordered direct-parent edges, carrying per-edge flags.
pub type AncestorItems = IndexMap<ItemId, Vec<AncestorEdge>>;

pub fn document_ancestors_from_json(json: &str) -> Result<DocumentAncestors, DecodeError> { Ok(serde_json::from_str(json)?) }

pub fn document_ancestors_to_json(ancestors: &DocumentAncestors) -> Result<String, DecodeError> { Ok(serde_json::to_string(ancestors)?) }

pub fn ancestor_items_from_json(json: &str) -> Result<AncestorItems, DecodeError> { Ok(serde_json::from_str(json)?) }

pub fn ancestor_items_to_json(items: &AncestorItems) -> Result<String, DecodeError> { Ok(serde_json::to_string(items)?) }

/// Drop the flags, keeping only the parent ids.
pub fn strip_edge_flags(items: &AncestorItems) -> DocumentAncestors {
    items.iter().map(|(id, edges)| (id.clone(), edges.iter().map(|edge| edge.id.clone()).collect())).collect()
}
