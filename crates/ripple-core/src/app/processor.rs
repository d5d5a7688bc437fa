//! Event processor: the poll/dispatch background loop.
//!
//! One processor instance runs per deployment. Each cycle fetches a bounded
//! batch of unprocessed events, fans every event out to its cascade
//! concurrently, joins all of them, and commits the processed flag per
//! event. Failure domains are per event: one failing cascade leaves its
//! event unprocessed for the next cycle and does not touch the rest of the
//! batch, let alone the loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::app::cascades::CascadeDispatcher;
use crate::domain::{EventId, EventRecord, RippleError};
use crate::ports::EventStore;

/// Operational tuning knobs. Neither is a behavioral contract.
#[derive(Debug, Clone, Copy)]
pub struct ProcessorConfig {
    /// Maximum events fetched per cycle.
    pub batch_size: usize,
    /// Sleep between cycles.
    pub poll_interval: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// What one cycle did, for the cycle summary log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub fetched: usize,
    pub processed: usize,
}

pub struct EventProcessor {
    store: Arc<dyn EventStore>,
    dispatcher: Arc<CascadeDispatcher>,
    config: ProcessorConfig,
    /// Events that came back with a logic error (no cascade wired, or
    /// already processed). Retrying them cannot help, so they are excluded
    /// from future batches; the records stay unprocessed in the store for
    /// operator attention. Without this, `batch_size` stuck events at the
    /// head of the batch order would starve everything behind them.
    parked: Mutex<HashSet<EventId>>,
}

impl EventProcessor {
    pub fn new(
        store: Arc<dyn EventStore>,
        dispatcher: Arc<CascadeDispatcher>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            store,
            dispatcher,
            config,
            parked: Mutex::new(HashSet::new()),
        }
    }

    /// Run one polling cycle: fetch, fan out, join, commit.
    ///
    /// Exposed on its own so tests (and the demo) can drive the processor
    /// deterministically without the sleep in between.
    pub async fn run_cycle(&self) -> Result<CycleStats, RippleError> {
        // Over-fetch by the parked count so parked records never occupy a
        // batch slot.
        let parked = self.parked.lock().await.clone();
        let limit = self.config.batch_size + parked.len();
        let batch: Vec<EventRecord> = self
            .store
            .unprocessed_batch(limit)
            .await?
            .into_iter()
            .filter(|record| !parked.contains(&record.id()))
            .take(self.config.batch_size)
            .collect();
        let fetched = batch.len();

        let mut inflight = JoinSet::new();
        for record in batch {
            let store = Arc::clone(&self.store);
            let dispatcher = Arc::clone(&self.dispatcher);
            inflight.spawn(async move { process_one(store, dispatcher, record).await });
        }

        let mut processed = 0;
        while let Some(joined) = inflight.join_next().await {
            match joined {
                Ok(Ok(event_id)) => {
                    tracing::debug!(event = %event_id, "event processed");
                    processed += 1;
                }
                Ok(Err((event_id, err))) => match err {
                    // Logic errors: retrying will not help, an operator has
                    // to look at the event. Park it so it stops occupying
                    // batch slots.
                    RippleError::UnhandledEvent(_) | RippleError::AlreadyProcessed(_) => {
                        tracing::error!(event = %event_id, error = %err, "event parked unprocessed");
                        self.parked.lock().await.insert(event_id);
                    }
                    _ => {
                        tracing::warn!(
                            event = %event_id,
                            error = %err,
                            "cascade failed; event will be retried next cycle"
                        );
                    }
                },
                Err(join_err) => {
                    // A panicked cascade task. Its event stays unprocessed.
                    tracing::error!(error = %join_err, "cascade task panicked");
                }
            }
        }

        Ok(CycleStats { fetched, processed })
    }

    /// Start the background loop. The returned handle owns the shutdown
    /// signal; dropping it without calling shutdown leaves the loop running
    /// detached.
    pub fn spawn(self) -> ProcessorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            self.run_loop(shutdown_rx).await;
        });
        ProcessorHandle { shutdown_tx, join }
    }

    async fn run_loop(self, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            match self.run_cycle().await {
                Ok(stats) if stats.fetched > 0 => {
                    tracing::info!(
                        fetched = stats.fetched,
                        processed = stats.processed,
                        "cycle complete"
                    );
                }
                Ok(_) => {
                    tracing::debug!("cycle complete, no pending events");
                }
                Err(err) => {
                    // Store unreachable or similar. Nothing was committed;
                    // try again at the next scheduled cycle.
                    tracing::warn!(error = %err, "cycle failed");
                }
            }

            // The sleep is a suspension point: shutdown interrupts it, the
            // in-flight batch above has already completed.
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
        tracing::info!("event processor stopped");
    }
}

/// Handle to a spawned processor.
/// - `request_shutdown()` stops the loop after the current cycle.
/// - `shutdown_and_join()` additionally waits for it to exit.
pub struct ProcessorHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ProcessorHandle {
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn process_one(
    store: Arc<dyn EventStore>,
    dispatcher: Arc<CascadeDispatcher>,
    mut record: EventRecord,
) -> Result<EventId, (EventId, RippleError)> {
    let event_id = record.id();
    dispatcher
        .dispatch(record.event())
        .await
        .map_err(|e| (event_id, e))?;
    record.mark_processed().map_err(|e| (event_id, e))?;
    store.update(&record).await.map_err(|e| (event_id, e))?;
    Ok(event_id)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use ulid::Ulid;

    use super::*;
    use crate::domain::{AccountId, Application, Contributor, DomainEvent, Position, Project};
    use crate::impls::{
        InMemoryAccounts, InMemoryApplications, InMemoryCollaborations, InMemoryContributors,
        InMemoryEventStore, InMemoryProjects,
    };
    use crate::ports::{
        AccountService, ApplicationRepository, ContributorRepository, EventCounts,
        ProjectRepository,
    };

    fn some<T: crate::domain::ids::IdMarker>() -> crate::domain::ids::Id<T> {
        crate::domain::ids::Id::from_ulid(Ulid::new())
    }

    fn record(event: DomainEvent) -> EventRecord {
        EventRecord::new(some(), Utc::now(), event)
    }

    struct Fixture {
        store: Arc<InMemoryEventStore>,
        accounts: Arc<InMemoryAccounts>,
        contributors: Arc<InMemoryContributors>,
        projects: Arc<InMemoryProjects>,
        applications: Arc<InMemoryApplications>,
        collaborations: Arc<InMemoryCollaborations>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryEventStore::new()),
                accounts: Arc::new(InMemoryAccounts::new()),
                contributors: Arc::new(InMemoryContributors::new()),
                projects: Arc::new(InMemoryProjects::new()),
                applications: Arc::new(InMemoryApplications::new()),
                collaborations: Arc::new(InMemoryCollaborations::new()),
            }
        }

        fn processor(&self) -> EventProcessor {
            self.processor_with_accounts(Arc::clone(&self.accounts) as Arc<dyn AccountService>)
        }

        fn processor_with_accounts(&self, accounts: Arc<dyn AccountService>) -> EventProcessor {
            let dispatcher = CascadeDispatcher::new(
                accounts,
                Arc::clone(&self.projects) as _,
                Arc::clone(&self.applications) as _,
                Arc::clone(&self.collaborations) as _,
            );
            EventProcessor::new(
                Arc::clone(&self.store) as _,
                Arc::new(dispatcher),
                ProcessorConfig {
                    batch_size: 10,
                    poll_interval: Duration::from_millis(10),
                },
            )
        }
    }

    /// Account system double that fails a configured number of calls before
    /// recovering.
    struct FlakyAccounts {
        remaining_failures: AtomicU32,
        inner: Arc<InMemoryAccounts>,
    }

    #[async_trait]
    impl AccountService for FlakyAccounts {
        async fn remove_account(&self, account_id: AccountId) -> Result<(), RippleError> {
            let left = self.remaining_failures.load(Ordering::Relaxed);
            if left > 0 {
                self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
                return Err(RippleError::Account(format!(
                    "intentional failure (left={left})"
                )));
            }
            self.inner.remove_account(account_id).await
        }
    }

    #[tokio::test]
    async fn contributor_removed_scenario_settles_in_one_cycle() {
        let fx = Fixture::new();

        // Contributor c1 authored p1 (one position) and applied to an
        // unrelated project.
        let account = some();
        let c1 = Contributor::new(some(), account, "c1");
        fx.accounts.create_account(account).await;
        fx.contributors.insert(c1.clone()).await.unwrap();

        let mut p1 = Project::new(some(), c1.id(), "p1");
        p1.add_position(Position::new(some(), "pos1"));
        fx.projects.insert(p1.clone()).await.unwrap();

        let a1 = Application::submit(some(), c1.id(), some(), some());
        fx.applications.insert(a1.clone()).await.unwrap();

        fx.store
            .add(record(DomainEvent::ContributorRemoved {
                contributor_id: c1.id(),
                account_id: account,
            }))
            .await
            .unwrap();

        let stats = fx.processor().run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 1, processed: 1 });

        assert!(fx.projects.get(p1.id()).await.unwrap().is_none());
        assert!(fx.applications.get(a1.id()).await.unwrap().is_none());
        assert!(!fx.accounts.has_account(account).await);
        assert!(fx.store.unprocessed_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_failing_event_does_not_block_the_batch() {
        let fx = Fixture::new();

        let project: crate::domain::ProjectId = some();
        let doomed = Application::submit(some(), some(), project, some());
        fx.applications.insert(doomed.clone()).await.unwrap();

        // Event 1 will fail (flaky account system), event 2 must still go
        // through in the same cycle.
        fx.store
            .add(record(DomainEvent::ContributorRemoved {
                contributor_id: some(),
                account_id: some(),
            }))
            .await
            .unwrap();
        fx.store
            .add(record(DomainEvent::ProjectRemoved { project_id: project }))
            .await
            .unwrap();

        let flaky = Arc::new(FlakyAccounts {
            remaining_failures: AtomicU32::new(1),
            inner: Arc::clone(&fx.accounts),
        });
        let processor = fx.processor_with_accounts(flaky as _);

        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats.fetched, 2);
        assert_eq!(stats.processed, 1);
        assert!(fx.applications.get(doomed.id()).await.unwrap().is_none());

        // The failed event is retried the next cycle, and the fault has
        // cleared by now.
        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 1, processed: 1 });
        assert!(fx.store.unprocessed_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unhandled_variants_stay_unprocessed() {
        let fx = Fixture::new();

        fx.store
            .add(record(DomainEvent::ApplicationSubmitted {
                application_id: some(),
            }))
            .await
            .unwrap();

        let processor = fx.processor();
        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 1, processed: 0 });

        // Parked after the first attempt: no longer fetched, but still
        // unprocessed in the store for operator attention.
        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 0, processed: 0 });
        assert_eq!(fx.store.unprocessed_batch(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn parked_events_do_not_starve_newer_events() {
        let fx = Fixture::new();

        // A full batch of events nobody handles, at the head of the order.
        for _ in 0..10 {
            fx.store
                .add(record(DomainEvent::ApplicationSubmitted {
                    application_id: some(),
                }))
                .await
                .unwrap();
        }
        // Ids minted in the same millisecond order randomly; make sure the
        // removal event sorts after the stuck ones.
        tokio::time::sleep(Duration::from_millis(2)).await;

        let project: crate::domain::ProjectId = some();
        let doomed = Application::submit(some(), some(), project, some());
        fx.applications.insert(doomed.clone()).await.unwrap();
        fx.store
            .add(record(DomainEvent::ProjectRemoved { project_id: project }))
            .await
            .unwrap();

        let processor = fx.processor();

        // First cycle burns on the stuck head of the order and parks it.
        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 10, processed: 0 });

        // Second cycle reaches past the parked events.
        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 1, processed: 1 });
        assert!(fx.applications.get(doomed.id()).await.unwrap().is_none());

        // The parked records are untouched, awaiting an operator.
        let counts = fx.store.counts().await.unwrap();
        assert_eq!(counts, EventCounts { pending: 10, processed: 1 });
    }

    #[tokio::test]
    async fn batch_size_bounds_a_cycle() {
        let fx = Fixture::new();
        for _ in 0..15 {
            fx.store
                .add(record(DomainEvent::ProjectRemoved { project_id: some() }))
                .await
                .unwrap();
        }

        let processor = fx.processor();
        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 10, processed: 10 });

        let stats = processor.run_cycle().await.unwrap();
        assert_eq!(stats, CycleStats { fetched: 5, processed: 5 });
    }

    #[tokio::test]
    async fn spawned_loop_drains_events_and_shuts_down() {
        let fx = Fixture::new();
        fx.store
            .add(record(DomainEvent::ProjectRemoved { project_id: some() }))
            .await
            .unwrap();

        let handle = fx.processor().spawn();

        // Poll until the loop has picked the event up.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            if fx.store.unprocessed_batch(10).await.unwrap().is_empty() {
                break;
            }
            assert!(tokio::time::Instant::now() < deadline, "event never processed");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        handle.shutdown_and_join().await;
    }
}
