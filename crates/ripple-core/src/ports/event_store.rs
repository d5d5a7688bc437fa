//! EventStore port.
//!
//! The store is append-only from the subsystem's point of view: events are
//! added, their processed flag is updated, nothing is ever deleted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{EventRecord, RippleError};

/// Store counts, for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub pending: usize,
    pub processed: usize,
}

/// Durable store of domain events with per-event processed state.
///
/// Contract:
/// - `unprocessed_batch` returns events in a deterministic order (creation
///   order) and never includes processed events.
/// - `add` rejects an id the store already holds.
/// - `update` rejects an id the store has never seen; it is how the
///   processed flag is committed.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn add(&self, record: EventRecord) -> Result<(), RippleError>;

    async fn update(&self, record: &EventRecord) -> Result<(), RippleError>;

    async fn unprocessed_batch(&self, limit: usize) -> Result<Vec<EventRecord>, RippleError>;

    async fn counts(&self) -> Result<EventCounts, RippleError>;
}
