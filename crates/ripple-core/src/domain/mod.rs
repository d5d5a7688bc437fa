//! Domain model: identifiers, events, and the aggregates cascades touch.

pub mod application;
pub mod collaboration;
pub mod contributor;
pub mod errors;
pub mod event;
pub mod ids;
pub mod project;

pub use application::{Application, ApplicationStatus};
pub use collaboration::Collaboration;
pub use contributor::Contributor;
pub use errors::RippleError;
pub use event::{DomainEvent, EventRecord};
pub use ids::{
    AccountId, ApplicationId, CollaborationId, ContributorId, EventId, PositionId, ProjectId,
};
pub use project::{Position, Project};
