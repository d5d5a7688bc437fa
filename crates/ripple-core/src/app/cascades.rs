//! Cascade handlers: the compensating changes each event fans out into.
//!
//! A cascade is a pure mapping from the ids in an event payload to a set of
//! independent cleanup operations against the other aggregates. The
//! operations inside one cascade target disjoint data, so they run
//! concurrently and are jointly awaited; the event is only marked processed
//! once every one of them succeeded.
//!
//! Every cascade is idempotent. Delivery is at-least-once: a crash between
//! "cascade ran" and "record updated" re-runs the cascade, which must then
//! find nothing left to remove and succeed.

use std::sync::Arc;

use crate::domain::{
    AccountId, ContributorId, DomainEvent, PositionId, ProjectId, RippleError,
};
use crate::ports::{
    AccountService, ApplicationRepository, CollaborationRepository, ProjectRepository,
};

/// Cleanup after a contributor is removed: their external account, their
/// authored projects, their submitted applications, and every collaboration
/// they took part in. The four operations are mutually independent.
pub struct ContributorRemovedCascade {
    accounts: Arc<dyn AccountService>,
    projects: Arc<dyn ProjectRepository>,
    applications: Arc<dyn ApplicationRepository>,
    collaborations: Arc<dyn CollaborationRepository>,
}

impl ContributorRemovedCascade {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        projects: Arc<dyn ProjectRepository>,
        applications: Arc<dyn ApplicationRepository>,
        collaborations: Arc<dyn CollaborationRepository>,
    ) -> Self {
        Self {
            accounts,
            projects,
            applications,
            collaborations,
        }
    }

    pub async fn run(
        &self,
        contributor_id: ContributorId,
        account_id: AccountId,
    ) -> Result<(), RippleError> {
        tokio::try_join!(
            self.accounts.remove_account(account_id),
            self.remove_authored_projects(contributor_id),
            self.remove_submitted_applications(contributor_id),
            self.remove_collaborations(contributor_id),
        )?;
        Ok(())
    }

    async fn remove_authored_projects(
        &self,
        contributor_id: ContributorId,
    ) -> Result<(), RippleError> {
        for project in self.projects.authored_by(contributor_id).await? {
            self.projects.remove(project.id()).await?;
        }
        Ok(())
    }

    async fn remove_submitted_applications(
        &self,
        contributor_id: ContributorId,
    ) -> Result<(), RippleError> {
        for application in self.applications.submitted_by(contributor_id).await? {
            self.applications.remove(application.id()).await?;
        }
        Ok(())
    }

    async fn remove_collaborations(
        &self,
        contributor_id: ContributorId,
    ) -> Result<(), RippleError> {
        for collaboration in self.collaborations.with_collaborator(contributor_id).await? {
            self.collaborations.remove(collaboration.id()).await?;
        }
        Ok(())
    }
}

/// Cleanup after a project is removed: every application for any of its
/// positions, and every collaboration on it.
pub struct ProjectRemovedCascade {
    applications: Arc<dyn ApplicationRepository>,
    collaborations: Arc<dyn CollaborationRepository>,
}

impl ProjectRemovedCascade {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        collaborations: Arc<dyn CollaborationRepository>,
    ) -> Self {
        Self {
            applications,
            collaborations,
        }
    }

    pub async fn run(&self, project_id: ProjectId) -> Result<(), RippleError> {
        tokio::try_join!(
            self.remove_applications(project_id),
            self.remove_collaborations(project_id),
        )?;
        Ok(())
    }

    async fn remove_applications(&self, project_id: ProjectId) -> Result<(), RippleError> {
        for application in self.applications.for_project(project_id).await? {
            self.applications.remove(application.id()).await?;
        }
        Ok(())
    }

    async fn remove_collaborations(&self, project_id: ProjectId) -> Result<(), RippleError> {
        for collaboration in self.collaborations.for_project(project_id).await? {
            self.collaborations.remove(collaboration.id()).await?;
        }
        Ok(())
    }
}

/// Cleanup after a single position is removed: the applications scoped to
/// exactly that (project, position) pair. Applications for the project's
/// other positions are untouched.
pub struct PositionRemovedCascade {
    applications: Arc<dyn ApplicationRepository>,
}

impl PositionRemovedCascade {
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    pub async fn run(
        &self,
        project_id: ProjectId,
        position_id: PositionId,
    ) -> Result<(), RippleError> {
        for application in self.applications.for_position(project_id, position_id).await? {
            self.applications.remove(application.id()).await?;
        }
        Ok(())
    }
}

/// Routes an event to its cascade with an exhaustive match.
///
/// The variants without an active cascade produce `UnhandledEvent`: the
/// processor logs it and leaves the event unprocessed for operator
/// attention. Silently dropping an event is not an option, and neither is
/// taking the whole loop down over one of them.
pub struct CascadeDispatcher {
    contributor_removed: ContributorRemovedCascade,
    project_removed: ProjectRemovedCascade,
    position_removed: PositionRemovedCascade,
}

impl CascadeDispatcher {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        projects: Arc<dyn ProjectRepository>,
        applications: Arc<dyn ApplicationRepository>,
        collaborations: Arc<dyn CollaborationRepository>,
    ) -> Self {
        Self {
            contributor_removed: ContributorRemovedCascade::new(
                accounts,
                projects,
                Arc::clone(&applications),
                Arc::clone(&collaborations),
            ),
            project_removed: ProjectRemovedCascade::new(
                Arc::clone(&applications),
                collaborations,
            ),
            position_removed: PositionRemovedCascade::new(applications),
        }
    }

    pub async fn dispatch(&self, event: &DomainEvent) -> Result<(), RippleError> {
        match event {
            DomainEvent::ContributorRemoved {
                contributor_id,
                account_id,
            } => {
                self.contributor_removed
                    .run(*contributor_id, *account_id)
                    .await
            }
            DomainEvent::ProjectRemoved { project_id } => {
                self.project_removed.run(*project_id).await
            }
            DomainEvent::PositionRemoved {
                project_id,
                position_id,
            } => self.position_removed.run(*project_id, *position_id).await,
            other @ (DomainEvent::ApplicationSubmitted { .. }
            | DomainEvent::ApplicationAccepted { .. }
            | DomainEvent::PositionClosed { .. }) => {
                Err(RippleError::UnhandledEvent(other.kind()))
            }
        }
    }
}
