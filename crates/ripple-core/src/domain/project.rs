//! Project aggregate with its embedded positions.

use serde::{Deserialize, Serialize};

use super::event::DomainEvent;
use super::ids::{ContributorId, PositionId, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    id: PositionId,
    title: String,
    open: bool,
}

impl Position {
    pub fn new(id: PositionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            open: true,
        }
    }

    pub fn id(&self) -> PositionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    author_id: ContributorId,
    title: String,
    positions: Vec<Position>,
    #[serde(skip)]
    raised: Vec<DomainEvent>,
}

impl Project {
    pub fn new(id: ProjectId, author_id: ContributorId, title: impl Into<String>) -> Self {
        Self {
            id,
            author_id,
            title: title.into(),
            positions: Vec::new(),
            raised: Vec::new(),
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn author_id(&self) -> ContributorId {
        self.author_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn add_position(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Raise the project removal event.
    pub fn remove(&mut self) {
        self.raised.push(DomainEvent::ProjectRemoved {
            project_id: self.id,
        });
    }

    /// Drop a position from the project and raise the removal event.
    /// Removing an unknown position raises nothing.
    pub fn remove_position(&mut self, position_id: PositionId) {
        let before = self.positions.len();
        self.positions.retain(|p| p.id() != position_id);
        if self.positions.len() < before {
            self.raised.push(DomainEvent::PositionRemoved {
                project_id: self.id,
                position_id,
            });
        }
    }

    /// Close a position (stops accepting applications) and raise the closed
    /// event. Closing an unknown or already-closed position raises nothing.
    pub fn close_position(&mut self, position_id: PositionId) {
        if let Some(position) = self
            .positions
            .iter_mut()
            .find(|p| p.id() == position_id && p.open)
        {
            position.open = false;
            self.raised.push(DomainEvent::PositionClosed {
                project_id: self.id,
                position_id,
            });
        }
    }

    /// Drain the buffered events.
    pub fn take_raised(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.raised)
    }
}
