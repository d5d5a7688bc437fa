//! Collaboration aggregate (an accepted applicant working on a position).
//!
//! Collaborations are created by the application layer when an application
//! is accepted; they raise no events of their own and are only ever removed
//! by cascades.

use serde::{Deserialize, Serialize};

use super::ids::{CollaborationId, ContributorId, PositionId, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    id: CollaborationId,
    project_id: ProjectId,
    position_id: PositionId,
    collaborator_id: ContributorId,
}

impl Collaboration {
    pub fn new(
        id: CollaborationId,
        project_id: ProjectId,
        position_id: PositionId,
        collaborator_id: ContributorId,
    ) -> Self {
        Self {
            id,
            project_id,
            position_id,
            collaborator_id,
        }
    }

    pub fn id(&self) -> CollaborationId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn position_id(&self) -> PositionId {
        self.position_id
    }

    pub fn collaborator_id(&self) -> ContributorId {
        self.collaborator_id
    }
}
