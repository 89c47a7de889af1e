use tracing::trace;

use super::Ancestors;
use crate::traversal::Exploration;

/// Whether some item of the exploration reaches a root using only non-hidden edges.
///
/// An item with an empty edge list is a root. Items missing from `ancestors`
/// are dead ends: nothing proves they lead to a root.
pub fn has_at_least_one_visible_parent_path(ancestors: &Ancestors, mut exploration: Exploration) -> bool {
    while let Some(candidate) = exploration.next() {
        if exploration.is_explored(&candidate) {
            continue;
        }
        if let Some(edges) = ancestors.get(candidate.as_str()) {
            if edges.is_empty() {
                trace!("visible path reaches root {}", candidate);
                return true;
            }
            exploration.push(edges.iter().filter(|edge| edge.is_visible()).map(|edge| edge.id.clone()));
        }
        exploration.mark_explored(candidate);
    }
    false
}
