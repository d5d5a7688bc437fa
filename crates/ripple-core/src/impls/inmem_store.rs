//! In-memory EventStore implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{EventId, EventRecord, RippleError};
use crate::ports::{EventCounts, EventStore};

/// Development/test implementation of the event store.
///
/// Records live in a `BTreeMap` keyed by `EventId`; ULID keys sort by
/// creation time, so iteration order doubles as the deterministic batch
/// order the port requires.
#[derive(Default)]
pub struct InMemoryEventStore {
    records: Mutex<BTreeMap<EventId, EventRecord>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one record by id (test hook).
    pub async fn get(&self, id: EventId) -> Option<EventRecord> {
        self.records.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn add(&self, record: EventRecord) -> Result<(), RippleError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.id()) {
            return Err(RippleError::DuplicateEvent(record.id()));
        }
        records.insert(record.id(), record);
        Ok(())
    }

    async fn update(&self, record: &EventRecord) -> Result<(), RippleError> {
        let mut records = self.records.lock().await;
        if !records.contains_key(&record.id()) {
            return Err(RippleError::UnknownEvent(record.id()));
        }
        records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn unprocessed_batch(&self, limit: usize) -> Result<Vec<EventRecord>, RippleError> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|r| !r.is_processed())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn counts(&self) -> Result<EventCounts, RippleError> {
        let records = self.records.lock().await;
        let mut counts = EventCounts::default();
        for record in records.values() {
            if record.is_processed() {
                counts.processed += 1;
            } else {
                counts.pending += 1;
            }
        }
        Ok(counts)
    }
}
