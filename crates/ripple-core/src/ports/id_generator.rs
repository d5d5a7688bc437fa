//! Event id generation.
//!
//! Event ids are ULIDs built from the clock's current time plus randomness,
//! so ids generated by one process sort in creation order without any
//! coordination. The store's batch order rides on this.

use ulid::Ulid;

use crate::domain::EventId;
use crate::ports::Clock;

pub trait EventIdGenerator: Send + Sync {
    fn next_event_id(&self) -> EventId;
}

/// ULID-based generator. With a `FixedClock` the timestamp half is
/// deterministic, which is enough for tests that assert ordering.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> EventIdGenerator for UlidGenerator<C> {
    fn next_event_id(&self) -> EventId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        EventId::from(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
