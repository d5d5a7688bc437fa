use thiserror::Error;

use super::ids::EventId;

/// Errors raised by the event subsystem.
///
/// Handler-level failures (`Account`, `Store`) are transient by assumption:
/// the processor leaves the event unprocessed and retries it next cycle.
/// `UnhandledEvent` and `AlreadyProcessed` are logic errors and should fail
/// loudly instead of being retried into oblivion.
#[derive(Debug, Error)]
pub enum RippleError {
    /// The event variant has no active cascade wired to it.
    #[error("no cascade handler for event kind={0}")]
    UnhandledEvent(&'static str),

    /// An event was marked processed twice.
    #[error("event {0} is already processed")]
    AlreadyProcessed(EventId),

    /// `add` was called with an id the store already holds.
    #[error("event {0} already exists in the store")]
    DuplicateEvent(EventId),

    /// `update` was called with an id the store has never seen.
    #[error("event {0} is unknown to the store")]
    UnknownEvent(EventId),

    /// The event store itself failed (unreachable, corrupt, ...).
    #[error("event store failure: {0}")]
    Store(String),

    /// A repository call failed.
    #[error("repository failure: {0}")]
    Repository(String),

    /// A command referenced an aggregate that does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The external account system failed.
    #[error("account system failure: {0}")]
    Account(String),
}
