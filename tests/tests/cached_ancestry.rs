use common::*;

use std::sync::Arc;

use ancestry_core::{build_ancestors_list, get_ancestors, AncestorEdge, CachingParentSource, PrefetchingParentSource};
use anyhow::Result;

#[tokio::test]
async fn test_repeat_lookups_served_from_cache() -> Result<()> {
    let caching = CachingParentSource::new(account());

    let first = get_ancestors(&caching, &ids(&["img3"])).await?;
    assert_eq!(caching.inner().parent_queries(), 3);

    let second = get_ancestors(&caching, &ids(&["img3"])).await?;
    assert_eq!(second, first);
    assert_eq!(caching.inner().parent_queries(), 3);
    Ok(())
}

#[tokio::test]
async fn test_flush_after_instancing() -> Result<()> {
    let caching = CachingParentSource::new(account());
    get_ancestors(&caching, &ids(&["img3"])).await?;

    caching.inner().instance("photos", doc("img3"));
    let stale = get_ancestors(&caching, &ids(&["img3"])).await?;
    assert_eq!(stale.get("img3"), Some(&[AncestorEdge::new("trips")][..]));

    caching.flush("img3").await;
    let fresh = get_ancestors(&caching, &ids(&["img3"])).await?;
    assert_eq!(fresh.get("img3"), Some(&[AncestorEdge::new("photos"), AncestorEdge::new("trips")][..]));
    assert_eq!(strs(&build_ancestors_list("img3", &fresh.to_document_ancestors(false))?), vec!["photos", "root"]);
    // img3 and the newly reached photos; trips and root were still cached
    assert_eq!(caching.inner().parent_queries(), 5);
    Ok(())
}

#[tokio::test]
async fn test_shared_cache_across_tasks() -> Result<()> {
    let caching = Arc::new(CachingParentSource::new(account()));

    let mut handles = Vec::new();
    for item in ["img1", "img4", "img5"] {
        let caching = caching.clone();
        handles.push(tokio::spawn(async move { get_ancestors(&caching, &ids(&[item])).await }));
    }
    for handle in handles {
        let ancestors = handle.await??;
        assert!(ancestors.has("root"));
    }

    let queries = caching.inner().parent_queries();
    get_ancestors(&caching, &ids(&["img1", "img4", "img5"])).await?;
    assert_eq!(caching.inner().parent_queries(), queries);
    Ok(())
}

#[tokio::test]
async fn test_prefetch_for_a_request() -> Result<()> {
    let library = account();
    let prefetching = PrefetchingParentSource::new(&library);
    prefetching.prefetch(&ids(&["img1", "img4"])).await?;
    assert_eq!(library.parent_queries(), 1);

    let img1 = get_ancestors(&prefetching, &ids(&["img1"])).await?;
    assert_eq!(library.parent_queries(), 3);

    // Everything img4 needs was seen while resolving img1
    let img4 = get_ancestors(&prefetching, &ids(&["img4"])).await?;
    assert_eq!(library.parent_queries(), 3);
    assert_eq!(img4.get("trips-2024"), img1.get("trips-2024"));
    Ok(())
}
