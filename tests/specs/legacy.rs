//! Rolling-upgrade compatibility with bare-string legacy holders

use crate::prelude::*;
use ballast_core::HolderEntry;

#[tokio::test]
async fn mixed_holder_lists_decode_and_release_by_handle() {
    let (store, handler) = memory_handler();

    // State written by a mix of old and new coordinators
    store.seed(
        "/ballast/semaphores/acme/ci",
        br#"["item-1-legacy-job",{"buildset_path":"/ballast/buildsets/bs-2","job_name":"modern"}]"#,
    );

    let holders = handler.semaphore_holders("ci").await.unwrap();
    assert_eq!(holders.len(), 2);
    assert!(holders[0].is_handle("item-1-legacy-job"));

    // Releasing with the matching legacy handle removes exactly that entry
    handler
        .release(&item(1), &job("legacy-job", "ci"))
        .await
        .unwrap();

    let holders = handler.semaphore_holders("ci").await.unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(
        holders[0].as_record().map(|r| r.job_name.as_str()),
        Some("modern")
    );
}

#[tokio::test]
async fn legacy_holders_occupy_slots() {
    let (store, handler) = memory_handler();

    store.seed("/ballast/semaphores/acme/solo", br#"["item-9-old"]"#);

    assert!(!handler.acquire(&item(1), &job("a", "solo"), false).await.unwrap());

    handler.release(&item(9), &job("old", "solo")).await.unwrap();
    assert!(handler.acquire(&item(1), &job("a", "solo"), false).await.unwrap());
}

#[tokio::test]
async fn new_acquisitions_write_structured_records() {
    let (store, handler) = memory_handler();

    store.seed("/ballast/semaphores/acme/ci", br#"["item-9-old"]"#);
    assert!(handler.acquire(&item(1), &job("a", "ci"), false).await.unwrap());

    let holders = handler.semaphore_holders("ci").await.unwrap();
    assert!(matches!(holders[0], HolderEntry::Handle(_)));
    assert!(matches!(holders[1], HolderEntry::Record(_)));
}
