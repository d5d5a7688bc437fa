//! Application-layer commands.
//!
//! `CollabService` is the only producer of event records. Every command
//! commits the aggregate's own write through its repository first, then
//! drains the events the aggregate raised and persists them unprocessed in
//! the event store. The processor picks them up from there; nothing here
//! waits for cascades.

use std::sync::Arc;

use ulid::Ulid;

use crate::domain::{
    AccountId, Application, ApplicationId, Collaboration, CollaborationId, Contributor,
    ContributorId, DomainEvent, EventRecord, Position, PositionId, Project, ProjectId,
    RippleError,
};
use crate::ports::{
    ApplicationRepository, Clock, CollaborationRepository, ContributorRepository,
    EventIdGenerator, EventStore, ProjectRepository,
};

pub struct CollabService {
    contributors: Arc<dyn ContributorRepository>,
    projects: Arc<dyn ProjectRepository>,
    applications: Arc<dyn ApplicationRepository>,
    collaborations: Arc<dyn CollaborationRepository>,
    events: Arc<dyn EventStore>,
    event_ids: Arc<dyn EventIdGenerator>,
    clock: Arc<dyn Clock>,
}

impl CollabService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        contributors: Arc<dyn ContributorRepository>,
        projects: Arc<dyn ProjectRepository>,
        applications: Arc<dyn ApplicationRepository>,
        collaborations: Arc<dyn CollaborationRepository>,
        events: Arc<dyn EventStore>,
        event_ids: Arc<dyn EventIdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contributors,
            projects,
            applications,
            collaborations,
            events,
            event_ids,
            clock,
        }
    }

    pub async fn register_contributor(
        &self,
        account_id: AccountId,
        display_name: impl Into<String>,
    ) -> Result<ContributorId, RippleError> {
        let id = ContributorId::from_ulid(Ulid::new());
        self.contributors
            .insert(Contributor::new(id, account_id, display_name))
            .await?;
        Ok(id)
    }

    pub async fn publish_project(
        &self,
        author: ContributorId,
        title: impl Into<String>,
        position_titles: Vec<String>,
    ) -> Result<(ProjectId, Vec<PositionId>), RippleError> {
        let id = ProjectId::from_ulid(Ulid::new());
        let mut project = Project::new(id, author, title);
        let mut position_ids = Vec::with_capacity(position_titles.len());
        for title in position_titles {
            let position_id = PositionId::from_ulid(Ulid::new());
            project.add_position(Position::new(position_id, title));
            position_ids.push(position_id);
        }
        self.projects.insert(project).await?;
        Ok((id, position_ids))
    }

    pub async fn submit_application(
        &self,
        applicant: ContributorId,
        project: ProjectId,
        position: PositionId,
    ) -> Result<ApplicationId, RippleError> {
        let id = ApplicationId::from_ulid(Ulid::new());
        let mut application = Application::submit(id, applicant, project, position);
        let raised = application.take_raised();
        self.applications.insert(application).await?;
        self.persist_raised(raised).await?;
        Ok(id)
    }

    /// Accept an application and open the resulting collaboration.
    pub async fn accept_application(
        &self,
        id: ApplicationId,
    ) -> Result<CollaborationId, RippleError> {
        let mut application = self
            .applications
            .get(id)
            .await?
            .ok_or(RippleError::NotFound("application"))?;
        application.accept();
        let raised = application.take_raised();

        let collaboration_id = CollaborationId::from_ulid(Ulid::new());
        let collaboration = Collaboration::new(
            collaboration_id,
            application.project_id(),
            application.position_id(),
            application.applicant_id(),
        );

        self.applications.update(application).await?;
        self.collaborations.insert(collaboration).await?;
        self.persist_raised(raised).await?;
        Ok(collaboration_id)
    }

    /// Remove a contributor. The dependents (projects, applications,
    /// collaborations, the external account) are cleaned up asynchronously
    /// by the contributor-removed cascade.
    pub async fn remove_contributor(&self, id: ContributorId) -> Result<(), RippleError> {
        let mut contributor = self
            .contributors
            .get(id)
            .await?
            .ok_or(RippleError::NotFound("contributor"))?;
        contributor.remove();
        let raised = contributor.take_raised();

        self.contributors.remove(id).await?;
        self.persist_raised(raised).await
    }

    pub async fn remove_project(&self, id: ProjectId) -> Result<(), RippleError> {
        let mut project = self
            .projects
            .get(id)
            .await?
            .ok_or(RippleError::NotFound("project"))?;
        project.remove();
        let raised = project.take_raised();

        self.projects.remove(id).await?;
        self.persist_raised(raised).await
    }

    pub async fn remove_position(
        &self,
        project_id: ProjectId,
        position_id: PositionId,
    ) -> Result<(), RippleError> {
        let mut project = self
            .projects
            .get(project_id)
            .await?
            .ok_or(RippleError::NotFound("project"))?;
        project.remove_position(position_id);
        let raised = project.take_raised();

        self.projects.update(project).await?;
        self.persist_raised(raised).await
    }

    pub async fn close_position(
        &self,
        project_id: ProjectId,
        position_id: PositionId,
    ) -> Result<(), RippleError> {
        let mut project = self
            .projects
            .get(project_id)
            .await?
            .ok_or(RippleError::NotFound("project"))?;
        project.close_position(position_id);
        let raised = project.take_raised();

        self.projects.update(project).await?;
        self.persist_raised(raised).await
    }

    async fn persist_raised(&self, raised: Vec<DomainEvent>) -> Result<(), RippleError> {
        for event in raised {
            let record =
                EventRecord::new(self.event_ids.next_event_id(), self.clock.now(), event);
            self.events.add(record).await?;
        }
        Ok(())
    }
}
