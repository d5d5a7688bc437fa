//! Application layer: the processor loop, the cascades it dispatches to,
//! and the command service that produces events in the first place.

pub mod cascades;
pub mod processor;
pub mod service;

pub use self::cascades::{
    CascadeDispatcher, ContributorRemovedCascade, PositionRemovedCascade, ProjectRemovedCascade,
};
pub use self::processor::{CycleStats, EventProcessor, ProcessorConfig, ProcessorHandle};
pub use self::service::CollabService;
