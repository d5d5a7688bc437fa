//! Application aggregate (a contributor applying for a position).

use serde::{Deserialize, Serialize};

use super::event::DomainEvent;
use super::ids::{ApplicationId, ContributorId, PositionId, ProjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Submitted,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    applicant_id: ContributorId,
    project_id: ProjectId,
    position_id: PositionId,
    status: ApplicationStatus,
    #[serde(skip)]
    raised: Vec<DomainEvent>,
}

impl Application {
    /// Submitting is the aggregate's birth; it raises the submitted event.
    pub fn submit(
        id: ApplicationId,
        applicant_id: ContributorId,
        project_id: ProjectId,
        position_id: PositionId,
    ) -> Self {
        Self {
            id,
            applicant_id,
            project_id,
            position_id,
            status: ApplicationStatus::Submitted,
            raised: vec![DomainEvent::ApplicationSubmitted { application_id: id }],
        }
    }

    pub fn id(&self) -> ApplicationId {
        self.id
    }

    pub fn applicant_id(&self) -> ContributorId {
        self.applicant_id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn position_id(&self) -> PositionId {
        self.position_id
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Accept the application. Raises only on the transition out of
    /// `Submitted`.
    pub fn accept(&mut self) {
        if self.status == ApplicationStatus::Submitted {
            self.status = ApplicationStatus::Accepted;
            self.raised
                .push(DomainEvent::ApplicationAccepted { application_id: self.id });
        }
    }

    pub fn reject(&mut self) {
        if self.status == ApplicationStatus::Submitted {
            self.status = ApplicationStatus::Rejected;
        }
    }

    /// Drain the buffered events.
    pub fn take_raised(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.raised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn submitted() -> Application {
        Application::submit(
            ApplicationId::from_ulid(Ulid::new()),
            ContributorId::from_ulid(Ulid::new()),
            ProjectId::from_ulid(Ulid::new()),
            PositionId::from_ulid(Ulid::new()),
        )
    }

    #[test]
    fn submit_raises_submitted() {
        let mut app = submitted();
        let events = app.take_raised();
        assert_eq!(
            events,
            vec![DomainEvent::ApplicationSubmitted {
                application_id: app.id()
            }]
        );
    }

    #[test]
    fn accept_transitions_once() {
        let mut app = submitted();
        app.take_raised();

        app.accept();
        app.accept();

        assert_eq!(app.status(), ApplicationStatus::Accepted);
        assert_eq!(app.take_raised().len(), 1);
    }

    #[test]
    fn reject_does_not_raise() {
        let mut app = submitted();
        app.take_raised();

        app.reject();

        assert_eq!(app.status(), ApplicationStatus::Rejected);
        assert!(app.take_raised().is_empty());
    }
}
