use std::sync::Arc;
use tokio::time::{Duration, sleep};

use ripple_core::app::{CascadeDispatcher, CollabService, EventProcessor, ProcessorConfig};
use ripple_core::impls::{
    InMemoryAccounts, InMemoryApplications, InMemoryCollaborations, InMemoryContributors,
    InMemoryEventStore, InMemoryProjects,
};
use ripple_core::ports::{
    ApplicationRepository, EventStore, ProjectRepository, SystemClock, UlidGenerator,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // (A) In-memory world: event store, repositories, account system.
    let store = Arc::new(InMemoryEventStore::new());
    let accounts = Arc::new(InMemoryAccounts::new());
    let contributors = Arc::new(InMemoryContributors::new());
    let projects = Arc::new(InMemoryProjects::new());
    let applications = Arc::new(InMemoryApplications::new());
    let collaborations = Arc::new(InMemoryCollaborations::new());

    let service = CollabService::new(
        Arc::clone(&contributors) as _,
        Arc::clone(&projects) as _,
        Arc::clone(&applications) as _,
        Arc::clone(&collaborations) as _,
        Arc::clone(&store) as _,
        Arc::new(UlidGenerator::new(SystemClock)),
        Arc::new(SystemClock),
    );

    // (B) Seed: c1 authors p1 and applies to c2's project.
    let c1_account = ripple_core::domain::AccountId::from_ulid(ulid());
    accounts.create_account(c1_account).await;
    let c1 = service
        .register_contributor(c1_account, "c1")
        .await
        .expect("register c1");
    let (p1, _) = service
        .publish_project(c1, "p1", vec!["pos1".into()])
        .await
        .expect("publish p1");

    let c2 = service
        .register_contributor(ripple_core::domain::AccountId::from_ulid(ulid()), "c2")
        .await
        .expect("register c2");
    let (p2, p2_positions) = service
        .publish_project(c2, "p2", vec!["pos".into()])
        .await
        .expect("publish p2");
    let a1 = service
        .submit_application(c1, p2, p2_positions[0])
        .await
        .expect("submit a1");

    // (C) Start the background processor.
    let dispatcher = CascadeDispatcher::new(
        Arc::clone(&accounts) as _,
        Arc::clone(&projects) as _,
        Arc::clone(&applications) as _,
        Arc::clone(&collaborations) as _,
    );
    let processor = EventProcessor::new(
        Arc::clone(&store) as _,
        Arc::new(dispatcher),
        ProcessorConfig {
            batch_size: 10,
            poll_interval: Duration::from_millis(100),
        },
    );
    let handle = processor.spawn();

    // (D) Remove c1. The cascade runs asynchronously.
    service.remove_contributor(c1).await.expect("remove c1");
    println!("removed contributor {c1}; waiting for the cascade");

    // (E) Wait until no unprocessed event is left. The submitted event for
    // a1 has no active cascade and stays pending, so wait on the removal
    // effects instead of the raw counts.
    loop {
        let project_gone = projects.get(p1).await.expect("projects").is_none();
        let application_gone = applications.get(a1).await.expect("applications").is_none();
        let account_gone = !accounts.has_account(c1_account).await;
        if project_gone && application_gone && account_gone {
            break;
        }
        sleep(Duration::from_millis(50)).await;
    }

    let counts = store.counts().await.expect("counts");
    println!(
        "cascade settled: p1 removed, a1 removed, account removed (events pending={} processed={})",
        counts.pending, counts.processed
    );

    // (F) Graceful shutdown: in-flight work completes before exit.
    handle.shutdown_and_join().await;
}

fn ulid() -> ulid::Ulid {
    ulid::Ulid::new()
}
