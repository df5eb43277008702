//! Leak cleanup: orphaned holders are reclaimed, live ones untouched

use crate::prelude::*;

#[tokio::test]
async fn orphans_in_both_roots_are_reclaimed() {
    let (store, handler) = memory_handler();
    let orphan = item(1);
    let live = item(2);

    store.seed(&orphan.buildset_path, b"{}");
    store.seed(&live.buildset_path, b"{}");

    assert!(handler.acquire(&orphan, &job("a", "ci"), false).await.unwrap());
    assert!(handler.acquire(&orphan, &job("a", "shared"), false).await.unwrap());
    assert!(handler.acquire(&live, &job("b", "ci"), false).await.unwrap());

    // The orphan's owner vanishes without releasing
    store.remove_tree(&orphan.buildset_path);

    handler.cleanup_leaks().await.unwrap();

    let ci = handler.semaphore_holders("ci").await.unwrap();
    assert_eq!(ci.len(), 1);
    assert_eq!(ci[0].as_record().map(|r| r.job_name.as_str()), Some("b"));
    assert!(handler.semaphore_holders("shared").await.unwrap().is_empty());
}

#[tokio::test]
async fn cleanup_is_idempotent() {
    let (store, handler) = memory_handler();
    let orphan = item(1);

    store.seed(&orphan.buildset_path, b"{}");
    assert!(handler.acquire(&orphan, &job("a", "solo"), false).await.unwrap());
    store.remove_tree(&orphan.buildset_path);

    handler.cleanup_leaks().await.unwrap();
    assert!(handler.semaphore_holders("solo").await.unwrap().is_empty());

    // Nothing left to clean; no error, no change
    handler.cleanup_leaks().await.unwrap();
    assert!(handler.semaphore_holders("solo").await.unwrap().is_empty());
}

#[tokio::test]
async fn reclaimed_slot_becomes_acquirable() {
    let (store, handler) = memory_handler();
    let orphan = item(1);

    store.seed(&orphan.buildset_path, b"{}");
    assert!(handler.acquire(&orphan, &job("a", "solo"), false).await.unwrap());
    assert!(!handler.acquire(&item(2), &job("b", "solo"), false).await.unwrap());

    store.remove_tree(&orphan.buildset_path);
    handler.cleanup_leaks().await.unwrap();

    assert!(handler.acquire(&item(2), &job("b", "solo"), false).await.unwrap());
}

#[tokio::test]
async fn cleanup_on_an_empty_store_is_a_no_op() {
    let (_, handler) = memory_handler();
    handler.cleanup_leaks().await.unwrap();
    assert!(handler.get_semaphores().await.unwrap().is_empty());
}
