//! Gathering the ancestry of a set of items from a parent source.
//!
//! A [`ParentSource`] answers one question, "what are the direct parents of
//! these items", typically backed by a repository query. [`get_ancestors`]
//! repeats that question generation by generation until it reaches the roots.
//! Sources can be stacked: [`CachingParentSource`] keeps a bounded LRU of
//! answers across requests, [`PrefetchingParentSource`] memoizes everything
//! for the lifetime of one request.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use ancestry_proto::{AncestorEdge, AncestorItems, ItemId};
use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::ancestors::Ancestors;
use crate::config::{TraversalLimits, DEFAULT_CACHE_CAPACITY};
use crate::error::AncestryError;

#[async_trait]
pub trait ParentSource: Send + Sync {
    /// Direct parent edges for the requested items.
    ///
    /// Items the source knows nothing about may be left out of the result.
    async fn get_parents(&self, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError>;
}

/// Blanket implementation for references, so wrappers can borrow a source.
#[async_trait]
impl<S: ParentSource + ?Sized> ParentSource for &S {
    async fn get_parents(&self, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError> { (**self).get_parents(item_ids).await }
}

#[async_trait]
impl<S: ParentSource + ?Sized> ParentSource for Arc<S> {
    async fn get_parents(&self, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError> { (**self).get_parents(item_ids).await }
}

/// Collects the full ancestry of `item_ids`: every item, every ancestor, and
/// the parent edges of each, up to the roots.
///
/// Requested items the source does not return are recorded as roots, in every
/// generation, whether or not the source knew any of their siblings.
pub async fn get_ancestors<S: ParentSource + ?Sized>(source: &S, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError> {
    get_ancestors_with_limits(source, item_ids, &TraversalLimits::default()).await
}

pub async fn get_ancestors_with_limits<S: ParentSource + ?Sized>(
    source: &S,
    item_ids: &[ItemId],
    limits: &TraversalLimits,
) -> Result<Ancestors, AncestryError> {
    let mut found = AncestorItems::new();
    let mut generation: Vec<ItemId> = dedup(item_ids.iter().cloned());
    let mut depth = 0;

    while !generation.is_empty() {
        let parents = source.get_parents(&generation).await?;
        trace!("generation {}: {} requested, {} returned", depth, generation.len(), parents.len());

        for item_id in &generation {
            if !parents.has(item_id.as_str()) && !found.contains_key(item_id) {
                found.insert(item_id.clone(), Vec::new());
            }
        }

        let mut next = Vec::new();
        for (item_id, edges) in parents.get_items() {
            if found.contains_key(item_id) {
                continue;
            }
            next.extend(edges.iter().map(|edge| edge.id.clone()));
            found.insert(item_id.clone(), edges.clone());
        }

        generation = dedup(next.into_iter().filter(|id| !found.contains_key(id)));
        depth += 1;
        if !generation.is_empty() && depth > limits.max_depth {
            let origin = item_ids.first().cloned().unwrap_or_else(|| ItemId::from(""));
            warn!("ancestry of {} still growing after {} generations", origin, limits.max_depth);
            return Err(AncestryError::DepthExceeded { item: origin, limit: limits.max_depth });
        }
    }

    debug!("collected ancestry of {} items: {} entries over {} generations", item_ids.len(), found.len(), depth);
    Ok(Ancestors::new(found))
}

fn dedup(ids: impl Iterator<Item = ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}

// ---- In-memory source ----

/// Parent source over a fixed map. Ids missing from the map are roots.
#[derive(Debug, Clone, Default)]
pub struct MemoryParentSource {
    tree: AncestorItems,
}

impl MemoryParentSource {
    pub fn new(tree: AncestorItems) -> Self { Self { tree } }
}

#[async_trait]
impl ParentSource for MemoryParentSource {
    async fn get_parents(&self, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError> {
        Ok(item_ids.iter().map(|id| (id.clone(), self.tree.get(id).cloned().unwrap_or_default())).collect())
    }
}

// ---- Caching source ----

/// Read-through LRU cache in front of another source.
///
/// Entries live until evicted or flushed. Call [`CachingParentSource::flush`]
/// whenever an item is moved, instanced or removed from a collection.
pub struct CachingParentSource<S> {
    inner: S,
    cache: Mutex<LruCache<ItemId, Vec<AncestorEdge>>>,
}

impl<S: ParentSource> CachingParentSource<S> {
    pub fn new(inner: S) -> Self { Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY) }

    pub fn with_capacity(inner: S, capacity: NonZeroUsize) -> Self { Self { inner, cache: Mutex::new(LruCache::new(capacity)) } }

    /// Forget the cached parents of `item_id`.
    pub async fn flush(&self, item_id: &str) {
        if self.cache.lock().await.pop(item_id).is_some() {
            debug!("flushed cached parents of {}", item_id);
        }
    }

    pub async fn cached_len(&self) -> usize { self.cache.lock().await.len() }

    pub fn inner(&self) -> &S { &self.inner }
}

#[async_trait]
impl<S: ParentSource> ParentSource for CachingParentSource<S> {
    async fn get_parents(&self, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError> {
        let item_ids = dedup(item_ids.iter().cloned());
        let mut hits = AncestorItems::new();
        let mut misses = Vec::new();
        {
            let mut cache = self.cache.lock().await;
            for item_id in item_ids {
                match cache.get(&item_id) {
                    Some(edges) => {
                        hits.insert(item_id, edges.clone());
                    }
                    None => misses.push(item_id),
                }
            }
        }
        trace!("parent cache: {} hits, {} misses", hits.len(), misses.len());

        let cached = Ancestors::new(hits);
        if misses.is_empty() {
            return Ok(cached);
        }

        let fetched = self.inner.get_parents(&misses).await?;
        {
            let mut cache = self.cache.lock().await;
            for (item_id, edges) in fetched.get_items() {
                cache.put(item_id.clone(), edges.clone());
            }
        }
        Ok(cached.merge(&fetched))
    }
}

// ---- Prefetching source ----

/// Unbounded memo for the duration of one request.
///
/// Useful when a request resolves ancestry for many overlapping item sets:
/// warm it once with [`PrefetchingParentSource::prefetch`], then every
/// later lookup of those items is served from memory.
pub struct PrefetchingParentSource<S> {
    inner: S,
    memo: Mutex<HashMap<ItemId, Vec<AncestorEdge>>>,
}

impl<S: ParentSource> PrefetchingParentSource<S> {
    pub fn new(inner: S) -> Self { Self { inner, memo: Mutex::new(HashMap::new()) } }

    pub async fn prefetch(&self, item_ids: &[ItemId]) -> Result<(), AncestryError> {
        self.get_parents(item_ids).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: ParentSource> ParentSource for PrefetchingParentSource<S> {
    async fn get_parents(&self, item_ids: &[ItemId]) -> Result<Ancestors, AncestryError> {
        let mut items = AncestorItems::new();
        let mut to_fetch = Vec::new();
        {
            let memo = self.memo.lock().await;
            for item_id in item_ids {
                match memo.get(item_id) {
                    Some(edges) => {
                        items.insert(item_id.clone(), edges.clone());
                    }
                    None => to_fetch.push(item_id.clone()),
                }
            }
        }
        if to_fetch.is_empty() {
            return Ok(Ancestors::new(items));
        }

        let extra = self.inner.get_parents(&to_fetch).await?;
        let mut memo = self.memo.lock().await;
        for (item_id, edges) in extra.get_items() {
            memo.insert(item_id.clone(), edges.clone());
            items.insert(item_id.clone(), edges.clone());
        }
        Ok(Ancestors::new(items))
    }
}
