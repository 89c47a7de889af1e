//! Error types for ancestry resolution.
//!
//! Missing data is not an error here: unknown ids resolve to `false`, `None`
//! or empty results. These variants cover malformed graphs, traversal limits
//! and failures raised by the caller-supplied sources and conditions.

use ancestry_proto::{DecodeError, ItemId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AncestryError {
    /// `item` was reached again while expanding its own ancestry through `via`.
    #[error("cyclic ancestry detected at {item} (via {via})")]
    CyclicAncestry { item: ItemId, via: ItemId },

    #[error("ancestry of {item} exceeds the depth limit of {limit}")]
    DepthExceeded { item: ItemId, limit: usize },

    #[error("ancestry of {item} has more than {limit} paths to a root")]
    TooManyPaths { item: ItemId, limit: usize },

    /// Raised by a parent source, collection source or async condition
    #[error("source error: {0}")]
    Source(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl AncestryError {
    pub fn source_error(err: impl std::error::Error + Send + Sync + 'static) -> Self { AncestryError::Source(Box::new(err)) }

    pub fn is_cyclic(&self) -> bool { matches!(self, AncestryError::CyclicAncestry { .. }) }
}

impl From<serde_json::Error> for AncestryError {
    fn from(err: serde_json::Error) -> Self { AncestryError::Decode(DecodeError::from(err)) }
}
