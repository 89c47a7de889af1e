use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// One direct-parent relationship, as seen from the child.
///
/// The flags describe this particular parent copy, not the parent item globally:
/// the same item may be reachable through a hidden edge and a visible one at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorEdge {
    pub id: ItemId,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_overview: Option<bool>,
}

impl AncestorEdge {
    /// A visible, non-deleted edge to `id`.
    pub fn new(id: impl Into<ItemId>) -> Self { Self { id: id.into(), is_hidden: false, is_deleted: false, show_in_overview: None } }

    pub fn hidden(id: impl Into<ItemId>) -> Self { Self { is_hidden: true, ..Self::new(id) } }

    pub fn deleted(id: impl Into<ItemId>) -> Self { Self { is_deleted: true, ..Self::new(id) } }

    pub fn with_show_in_overview(mut self, show: bool) -> Self {
        self.show_in_overview = Some(show);
        self
    }

    pub fn is_visible(&self) -> bool { !self.is_hidden }
}

impl std::fmt::Display for AncestorEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if self.is_hidden {
            write!(f, " (hidden)")?;
        }
        if self.is_deleted {
            write!(f, " (deleted)")?;
        }
        Ok(())
    }
}
