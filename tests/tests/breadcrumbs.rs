use common::*;

use ancestry_core::{
    build_ancestor_tree, build_ancestors_list, build_ancestors_object, get_all_parents, get_all_paths_to_root_collection,
    get_all_paths_to_root_collection_with_limits, AncestryError, DocumentAncestors, TraversalLimits,
};
use anyhow::Result;

async fn account_ancestors() -> Result<DocumentAncestors> { Ok(build_ancestor_tree(&account(), "root").await?.to_document_ancestors()) }

#[tokio::test]
async fn test_breadcrumb_follows_first_parent() -> Result<()> {
    let ancestors = account_ancestors().await?;

    let mut crumbs = build_ancestors_list("img1", &ancestors)?;
    assert_eq!(strs(&crumbs), vec!["photos", "root"]);
    crumbs.reverse();
    assert_eq!(strs(&crumbs), vec!["root", "photos"]);

    assert_eq!(strs(&build_ancestors_list("readme", &ancestors)?), vec!["root"]);
    assert!(build_ancestors_list("root", &ancestors)?.is_empty());
    assert!(build_ancestors_list("not-in-account", &ancestors)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_breadcrumbs_for_many_items() -> Result<()> {
    let ancestors = account_ancestors().await?;
    let object = build_ancestors_object(["img4", "img5"], &ancestors)?;

    assert_eq!(object.keys().map(|id| id.as_str()).collect::<Vec<_>>(), vec!["img4", "img5"]);
    assert_eq!(strs(&object["img4"]), vec!["trips-2024", "photos", "root"]);
    assert_eq!(strs(&object["img5"]), vec!["private", "root"]);
    Ok(())
}

#[tokio::test]
async fn test_every_path_of_an_instanced_item() -> Result<()> {
    let ancestors = account_ancestors().await?;

    let paths = get_all_paths_to_root_collection("img1", &ancestors)?;
    let paths: Vec<Vec<&str>> = paths.iter().map(|path| strs(path)).collect();
    assert_eq!(
        paths,
        vec![vec!["root", "photos", "img1"], vec!["root", "photos", "trips-2024", "img1"], vec!["root", "trips", "trips-2024", "img1"],]
    );

    let unknown = get_all_paths_to_root_collection("not-in-account", &ancestors)?;
    assert_eq!(unknown, vec![ids(&["not-in-account"])]);
    Ok(())
}

#[tokio::test]
async fn test_path_limit() -> Result<()> {
    let ancestors = account_ancestors().await?;
    let limits = TraversalLimits::default().with_max_paths(2);

    let err = get_all_paths_to_root_collection_with_limits("img1", &ancestors, &limits).unwrap_err();
    assert!(matches!(err, AncestryError::TooManyPaths { limit: 2, .. }), "unexpected error: {err}");
    // A single-path item stays within the same limit
    assert_eq!(get_all_paths_to_root_collection_with_limits("img5", &ancestors, &limits)?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_all_parents_nearest_first() -> Result<()> {
    let ancestors = account_ancestors().await?;

    assert_eq!(strs(&get_all_parents("img1", &ancestors)), vec!["photos", "trips-2024", "root", "trips"]);
    assert!(get_all_parents("root", &ancestors).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cyclic_paths_are_rejected() -> Result<()> {
    let library = account();
    library.instance("trips-2024", col("trips"));
    let ancestors = build_ancestor_tree(&library, "root").await?.to_document_ancestors();

    let err = get_all_paths_to_root_collection("img3", &ancestors).unwrap_err();
    assert!(err.is_cyclic(), "unexpected error: {err}");
    // The first-parent chain of img3 runs trips -> root and never meets the loop
    assert_eq!(strs(&build_ancestors_list("img3", &ancestors)?), vec!["trips", "root"]);
    Ok(())
}
