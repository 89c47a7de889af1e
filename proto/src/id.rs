use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a document or collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self { ItemId(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for ItemId {
    fn from(val: &str) -> Self { ItemId(val.to_string()) }
}

impl From<String> for ItemId {
    fn from(val: String) -> Self { ItemId(val) }
}

impl From<&ItemId> for ItemId {
    fn from(val: &ItemId) -> Self { val.clone() }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self { id.0 }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str { &self.0 }
}

// Lets maps keyed by ItemId be queried with a plain &str.
impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str { &self.0 }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
