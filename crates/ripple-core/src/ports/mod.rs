//! Ports: the abstraction seams of the event subsystem.
//!
//! Each trait hides a collaborator the subsystem does not own (the event
//! store, the aggregate repositories, the account system, the clock). The
//! in-memory implementations in `impls` back them for development and
//! tests; real storage plugs in behind the same traits.

pub mod accounts;
pub mod clock;
pub mod event_store;
pub mod id_generator;
pub mod repositories;

pub use self::accounts::AccountService;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_store::{EventCounts, EventStore};
pub use self::id_generator::{EventIdGenerator, UlidGenerator};
pub use self::repositories::{
    ApplicationRepository, CollaborationRepository, ContributorRepository, ProjectRepository,
};
