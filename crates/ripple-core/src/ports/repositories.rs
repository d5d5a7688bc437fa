//! Repository ports for the aggregates cascades touch.
//!
//! These are the outbound contracts of the event subsystem; the real
//! application owns richer versions of them. Two rules matter here:
//!
//! - `remove` of an id that is already gone is a no-op, not an error. This
//!   is the idempotency foundation for at-least-once delivery: a cascade
//!   re-run after a crash must find nothing left to do and succeed.
//! - the scoped queries (`authored_by`, `for_position`, ...) are how a
//!   cascade locates dependents from the ids carried in the event payload.

use async_trait::async_trait;

use crate::domain::{
    Application, ApplicationId, Collaboration, CollaborationId, Contributor, ContributorId,
    PositionId, Project, ProjectId, RippleError,
};

#[async_trait]
pub trait ContributorRepository: Send + Sync {
    async fn get(&self, id: ContributorId) -> Result<Option<Contributor>, RippleError>;

    async fn insert(&self, contributor: Contributor) -> Result<(), RippleError>;

    async fn remove(&self, id: ContributorId) -> Result<(), RippleError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, RippleError>;

    async fn insert(&self, project: Project) -> Result<(), RippleError>;

    /// Overwrite an existing project (used after position mutations).
    async fn update(&self, project: Project) -> Result<(), RippleError>;

    async fn authored_by(&self, author: ContributorId) -> Result<Vec<Project>, RippleError>;

    async fn remove(&self, id: ProjectId) -> Result<(), RippleError>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn get(&self, id: ApplicationId) -> Result<Option<Application>, RippleError>;

    async fn insert(&self, application: Application) -> Result<(), RippleError>;

    async fn update(&self, application: Application) -> Result<(), RippleError>;

    async fn submitted_by(
        &self,
        applicant: ContributorId,
    ) -> Result<Vec<Application>, RippleError>;

    async fn for_project(&self, project: ProjectId) -> Result<Vec<Application>, RippleError>;

    async fn for_position(
        &self,
        project: ProjectId,
        position: PositionId,
    ) -> Result<Vec<Application>, RippleError>;

    async fn remove(&self, id: ApplicationId) -> Result<(), RippleError>;
}

#[async_trait]
pub trait CollaborationRepository: Send + Sync {
    async fn get(&self, id: CollaborationId) -> Result<Option<Collaboration>, RippleError>;

    async fn insert(&self, collaboration: Collaboration) -> Result<(), RippleError>;

    async fn with_collaborator(
        &self,
        collaborator: ContributorId,
    ) -> Result<Vec<Collaboration>, RippleError>;

    async fn for_project(&self, project: ProjectId) -> Result<Vec<Collaboration>, RippleError>;

    async fn remove(&self, id: CollaborationId) -> Result<(), RippleError>;
}
