//! Release semantics: round trips, notifications, unheld releases

use crate::prelude::*;
use ballast_core::{SemaphoreDefinition, StaticSemaphores};
use ballast_semaphore::{FakeNotifier, FakeStatsSink, SemaphoreHandler};
use ballast_store::MemoryStore;
use std::sync::Arc;

#[tokio::test]
async fn release_then_reacquire_round_trip() {
    let (_, handler) = memory_handler();
    let job = job("a", "solo");

    assert!(handler.acquire(&item(1), &job, false).await.unwrap());
    assert_eq!(handler.semaphore_holders("solo").await.unwrap().len(), 1);

    handler.release(&item(1), &job).await.unwrap();
    assert!(handler.semaphore_holders("solo").await.unwrap().is_empty());

    assert!(handler.acquire(&item(1), &job, false).await.unwrap());
    assert_eq!(handler.semaphore_holders("solo").await.unwrap().len(), 1);
}

#[tokio::test]
async fn freed_slot_is_acquirable_by_a_waiter() {
    let (_, handler) = memory_handler();

    assert!(handler.acquire(&item(1), &job("a", "solo"), false).await.unwrap());
    assert!(!handler.acquire(&item(2), &job("b", "solo"), false).await.unwrap());

    handler.release(&item(1), &job("a", "solo")).await.unwrap();
    assert!(handler.acquire(&item(2), &job("b", "solo"), false).await.unwrap());
}

#[tokio::test]
async fn release_emits_a_notification_per_semaphore() {
    let store = MemoryStore::new();
    let notifier = FakeNotifier::new();
    let layout = Arc::new(
        StaticSemaphores::new()
            .with(SemaphoreDefinition::new("ci", 2))
            .with(SemaphoreDefinition::new("solo", 1)),
    );
    let handler: SemaphoreHandler<_, _, _, FakeNotifier> = SemaphoreHandler::new(
        store,
        layout,
        "acme",
        FakeStatsSink::new(),
        notifier.clone(),
    );

    let job = Job::new("batch")
        .requiring(JobSemaphore::new("ci"))
        .requiring(JobSemaphore::new("solo"));
    assert!(handler.acquire(&item(1), &job, false).await.unwrap());
    assert!(notifier.events().is_empty());

    handler.release(&item(1), &job).await.unwrap();
    assert_eq!(
        notifier.events(),
        vec![
            ("acme".to_string(), "ci".to_string()),
            ("acme".to_string(), "solo".to_string()),
        ]
    );
}

#[tokio::test]
async fn releasing_an_unheld_semaphore_succeeds_quietly() {
    let (_, handler) = memory_handler();

    // Reported via the log, never as an error, so batch release of a
    // partially-acquired job always completes
    handler.release(&item(1), &job("a", "solo")).await.unwrap();

    assert!(handler.acquire(&item(2), &job("b", "solo"), false).await.unwrap());
    handler.release(&item(1), &job("a", "solo")).await.unwrap();
    assert_eq!(handler.semaphore_holders("solo").await.unwrap().len(), 1);
}
