//! ripple-core
//!
//! Domain-event propagation for a collaboration-matching platform: a state
//! change on one aggregate (a contributor being removed, say) is persisted
//! as a domain event and asynchronously fanned out as compensating changes
//! to the other aggregates.
//!
//! # Module layout
//! - **domain**: ids, the event union, and the aggregates cascades touch
//! - **ports**: abstraction seams (EventStore, repositories, AccountService,
//!   Clock, EventIdGenerator)
//! - **impls**: in-memory port implementations for development and tests
//! - **app**: the processor loop, the cascade handlers, and the command
//!   service that raises events
//!
//! # Delivery model
//! At-least-once: the processor marks an event processed only after its
//! whole cascade completed, so a crash in between re-runs the cascade.
//! Every cascade tolerates that; "remove" of something already gone is a
//! no-op everywhere. There are no ordering guarantees across events, and
//! none are needed: cascades target disjoint data.

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
