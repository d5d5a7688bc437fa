//! Domain events and their persisted record form.
//!
//! Events are a closed tagged union, not an open class hierarchy: adding a
//! cascade means adding a variant and the compiler points at every match
//! that must learn about it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::RippleError;
use super::ids::{
    AccountId, ApplicationId, ContributorId, EventId, PositionId, ProjectId,
};

/// A state change on one aggregate that other aggregates must react to.
///
/// `ContributorRemoved` carries the account id alongside the contributor id
/// so the account cleanup never depends on the contributor row still being
/// readable after the removal committed.
///
/// `ApplicationSubmitted`, `ApplicationAccepted` and `PositionClosed` are
/// raised and persisted but have no active cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    ContributorRemoved {
        contributor_id: ContributorId,
        account_id: AccountId,
    },
    ProjectRemoved {
        project_id: ProjectId,
    },
    PositionRemoved {
        project_id: ProjectId,
        position_id: PositionId,
    },
    ApplicationSubmitted {
        application_id: ApplicationId,
    },
    ApplicationAccepted {
        application_id: ApplicationId,
    },
    PositionClosed {
        project_id: ProjectId,
        position_id: PositionId,
    },
}

impl DomainEvent {
    /// Stable name of the variant, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::ContributorRemoved { .. } => "contributor_removed",
            DomainEvent::ProjectRemoved { .. } => "project_removed",
            DomainEvent::PositionRemoved { .. } => "position_removed",
            DomainEvent::ApplicationSubmitted { .. } => "application_submitted",
            DomainEvent::ApplicationAccepted { .. } => "application_accepted",
            DomainEvent::PositionClosed { .. } => "position_closed",
        }
    }
}

/// Persisted form of a domain event.
///
/// Lifecycle: created unprocessed, picked up by the processor, flipped to
/// processed exactly once, never deleted. Crash between "cascade ran" and
/// "record updated" means a re-run; the cascades tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    id: EventId,
    occurred_at: DateTime<Utc>,
    processed: bool,
    event: DomainEvent,
}

impl EventRecord {
    pub fn new(id: EventId, occurred_at: DateTime<Utc>, event: DomainEvent) -> Self {
        Self {
            id,
            occurred_at,
            processed: false,
            event,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn event(&self) -> &DomainEvent {
        &self.event
    }

    /// Transition `processed: false -> true`.
    ///
    /// Marking an already-processed record is a logic error, not a retry
    /// condition, so it fails instead of silently succeeding.
    pub fn mark_processed(&mut self) -> Result<(), RippleError> {
        if self.processed {
            return Err(RippleError::AlreadyProcessed(self.id));
        }
        self.processed = true;
        Ok(())
    }
}
