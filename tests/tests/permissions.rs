use common::*;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use ancestry_core::{
    get_ancestors, get_closest_ancestor_match, has_at_least_one_readable_parent_path, AncestorEdge, Ancestors, AncestryError, Exploration,
    ItemId,
};
use anyhow::Result;

/// Stand-in for an authorization service answering one item at a time.
struct Acl {
    readable: HashSet<ItemId>,
    unreachable: Option<ItemId>,
    checks: AtomicUsize,
}

#[derive(Debug, thiserror::Error)]
#[error("authorization service timed out for {0}")]
struct AclTimeout(ItemId);

impl Acl {
    fn new(readable: &[&str]) -> Self { Self { readable: ids(readable).into_iter().collect(), unreachable: None, checks: AtomicUsize::new(0) } }

    fn failing_on(mut self, id: &str) -> Self {
        self.unreachable = Some(id.into());
        self
    }

    async fn can_read(&self, id: ItemId) -> Result<bool, AncestryError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.unreachable.as_ref() == Some(&id) {
            return Err(AncestryError::source_error(AclTimeout(id)));
        }
        Ok(self.readable.contains(&id))
    }
}

async fn fetched() -> Result<Ancestors> { Ok(get_ancestors(&account(), &ids(&["img1", "img4", "img5"])).await?) }

#[tokio::test]
async fn test_closest_granting_collection() -> Result<()> {
    let ancestors = fetched().await?;

    let acl = Acl::new(&["trips"]);
    let found = ancestors.find_closest_parent(&ids(&["img1"]), |id| acl.can_read(id)).await?;
    assert_eq!(found, Some(AncestorEdge::new("trips")));
    // photos and trips-2024, then root and trips; photos is not asked twice
    assert_eq!(acl.checks.load(Ordering::SeqCst), 4);

    let acl = Acl::new(&["photos", "trips"]);
    let found = ancestors.find_closest_parent(&ids(&["img1"]), |id| acl.can_read(id)).await?;
    assert_eq!(found, Some(AncestorEdge::new("photos")));
    Ok(())
}

#[tokio::test]
async fn test_hidden_edges_still_grant() -> Result<()> {
    let ancestors = fetched().await?;

    let acl = Acl::new(&["root"]);
    let found = ancestors.find_closest_parent(&ids(&["img5"]), |id| acl.can_read(id)).await?;
    assert_eq!(found, Some(AncestorEdge::hidden("root")));
    Ok(())
}

#[tokio::test]
async fn test_no_grant_anywhere() -> Result<()> {
    let ancestors = fetched().await?;

    let acl = Acl::new(&[]);
    assert_eq!(ancestors.find_closest_parent(&ids(&["img4"]), |id| acl.can_read(id)).await?, None);
    // The item itself is never asked about
    let acl = Acl::new(&["img4"]);
    assert_eq!(ancestors.find_closest_parent(&ids(&["img4"]), |id| acl.can_read(id)).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_authorization_failure_propagates() -> Result<()> {
    let ancestors = fetched().await?;

    let acl = Acl::new(&["root"]).failing_on("trips-2024");
    let err = ancestors.find_closest_parent(&ids(&["img4"]), |id| acl.can_read(id)).await.unwrap_err();
    assert_eq!(err.to_string(), "source error: authorization service timed out for trips-2024");
    Ok(())
}

#[tokio::test]
async fn test_readable_parent_path() -> Result<()> {
    let ancestors = fetched().await?.to_document_ancestors(false);
    let readable = |values: &[&str]| -> HashSet<ItemId> { ids(values).into_iter().collect() };

    assert!(has_at_least_one_readable_parent_path(&ancestors, Exploration::from_item("img4"), &readable(&["trips"])));
    assert!(has_at_least_one_readable_parent_path(&ancestors, Exploration::from_item("img4"), &readable(&["img4"])));
    assert!(!has_at_least_one_readable_parent_path(&ancestors, Exploration::from_item("img4"), &readable(&["private"])));
    assert!(!has_at_least_one_readable_parent_path(&ancestors, Exploration::from_item("img4"), &readable(&[])));
    Ok(())
}

#[tokio::test]
async fn test_closest_match_respects_explored_items() -> Result<()> {
    let ancestors = fetched().await?.to_document_ancestors(false);

    let found = get_closest_ancestor_match(&ancestors, Exploration::from_item("img1"), |id| id == "trips");
    assert_eq!(found, Some(ItemId::from("trips")));

    // trips-2024 is still checked, but the search does not climb through it
    let exploration = Exploration::from_item("img1").with_explored(["trips-2024"]);
    assert_eq!(get_closest_ancestor_match(&ancestors, exploration, |id| id == "trips"), None);
    Ok(())
}
