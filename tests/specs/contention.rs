//! Concurrent contention: CAS races resolve to exactly the configured
//! capacity, with no coordination beyond the store's version check

use crate::prelude::*;
use ballast_core::{SemaphoreDefinition, StaticSemaphores};
use ballast_semaphore::{FakeNotifier, FakeStatsSink, SemaphoreHandler};
use ballast_store::MemoryStore;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_racing_acquires_produce_one_winner() {
    let (_, handler) = memory_handler();
    let handler = Arc::new(handler);

    let mut tasks = Vec::new();
    for n in 1..=2 {
        let handler = Arc::clone(&handler);
        tasks.push(tokio::spawn(async move {
            handler
                .acquire(&item(n), &job(&format!("job-{n}"), "solo"), false)
                .await
                .unwrap()
        }));
    }

    let mut wins = 0;
    for task in tasks {
        if task.await.unwrap() {
            wins += 1;
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(handler.semaphore_holders("solo").await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_workers_fill_exactly_the_available_slots() {
    let store = MemoryStore::new();
    let layout = Arc::new(StaticSemaphores::new().with(SemaphoreDefinition::new("pool", 4)));

    let mut tasks = Vec::new();
    for n in 1..=16u32 {
        let store = store.clone();
        let layout = Arc::clone(&layout);
        tasks.push(tokio::spawn(async move {
            // Each worker process gets its own handler instance
            let handler: SemaphoreHandler<_, _, _, _> = SemaphoreHandler::new(
                store,
                layout,
                "acme",
                FakeStatsSink::new(),
                FakeNotifier::new(),
            );
            handler
                .acquire(&item(n), &job(&format!("job-{n}"), "pool"), false)
                .await
                .unwrap()
        }));
    }

    let mut wins = 0;
    for task in tasks {
        if task.await.unwrap() {
            wins += 1;
        }
    }

    assert_eq!(wins, 4);

    let handler = SemaphoreHandler::new(
        store,
        layout,
        "acme",
        FakeStatsSink::new(),
        FakeNotifier::new(),
    );
    assert_eq!(handler.semaphore_holders("pool").await.unwrap().len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slots_cycle_correctly_under_churn() {
    let (_, handler) = memory_handler();
    let handler = Arc::new(handler);

    let mut tasks = Vec::new();
    for n in 1..=8u32 {
        let handler = Arc::clone(&handler);
        tasks.push(tokio::spawn(async move {
            let job = job(&format!("job-{n}"), "ci");
            for _ in 0..50 {
                if handler.acquire(&item(n), &job, false).await.unwrap() {
                    handler.release(&item(n), &job).await.unwrap();
                }
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    // Every worker released whatever it managed to acquire

    assert!(handler.semaphore_holders("ci").await.unwrap().is_empty());
}
