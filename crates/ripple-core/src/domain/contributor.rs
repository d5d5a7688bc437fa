//! Contributor aggregate.
//!
//! Aggregates buffer the events they raise in memory; the application layer
//! drains the buffer with `take_raised()` after committing the aggregate's
//! own write and hands the events to the event store. The buffer is never
//! persisted with the aggregate.

use serde::{Deserialize, Serialize};

use super::event::DomainEvent;
use super::ids::{AccountId, ContributorId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    id: ContributorId,
    account_id: AccountId,
    display_name: String,
    #[serde(skip)]
    raised: Vec<DomainEvent>,
}

impl Contributor {
    pub fn new(id: ContributorId, account_id: AccountId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            account_id,
            display_name: display_name.into(),
            raised: Vec::new(),
        }
    }

    pub fn id(&self) -> ContributorId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Raise the removal event. The account id travels in the payload so
    /// the cascade does not have to read this aggregate back.
    pub fn remove(&mut self) {
        self.raised.push(DomainEvent::ContributorRemoved {
            contributor_id: self.id,
            account_id: self.account_id,
        });
    }

    /// Drain the buffered events.
    pub fn take_raised(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.raised)
    }
}
