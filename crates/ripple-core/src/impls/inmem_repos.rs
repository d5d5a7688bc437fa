//! In-memory repositories and account system.
//!
//! Plain `Mutex<HashMap>` per aggregate, with linear scans for the scoped
//! queries. Enough for the demo binary and for exercising the cascades in
//! tests; real storage plugs in behind the same ports.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Application, ApplicationId, Collaboration, CollaborationId, Contributor, ContributorId,
    PositionId, Project, ProjectId, RippleError,
};
use crate::domain::AccountId;
use crate::ports::{
    AccountService, ApplicationRepository, CollaborationRepository, ContributorRepository,
    ProjectRepository,
};

#[derive(Default)]
pub struct InMemoryContributors {
    rows: Mutex<HashMap<ContributorId, Contributor>>,
}

impl InMemoryContributors {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContributorRepository for InMemoryContributors {
    async fn get(&self, id: ContributorId) -> Result<Option<Contributor>, RippleError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, contributor: Contributor) -> Result<(), RippleError> {
        self.rows.lock().await.insert(contributor.id(), contributor);
        Ok(())
    }

    async fn remove(&self, id: ContributorId) -> Result<(), RippleError> {
        // Removing an absent row is a no-op.
        self.rows.lock().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProjects {
    rows: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjects {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjects {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, RippleError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, project: Project) -> Result<(), RippleError> {
        self.rows.lock().await.insert(project.id(), project);
        Ok(())
    }

    async fn update(&self, project: Project) -> Result<(), RippleError> {
        self.rows.lock().await.insert(project.id(), project);
        Ok(())
    }

    async fn authored_by(&self, author: ContributorId) -> Result<Vec<Project>, RippleError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|p| p.author_id() == author)
            .cloned()
            .collect())
    }

    async fn remove(&self, id: ProjectId) -> Result<(), RippleError> {
        self.rows.lock().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryApplications {
    rows: Mutex<HashMap<ApplicationId, Application>>,
}

impl InMemoryApplications {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplications {
    async fn get(&self, id: ApplicationId) -> Result<Option<Application>, RippleError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, application: Application) -> Result<(), RippleError> {
        self.rows.lock().await.insert(application.id(), application);
        Ok(())
    }

    async fn update(&self, application: Application) -> Result<(), RippleError> {
        self.rows.lock().await.insert(application.id(), application);
        Ok(())
    }

    async fn submitted_by(
        &self,
        applicant: ContributorId,
    ) -> Result<Vec<Application>, RippleError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|a| a.applicant_id() == applicant)
            .cloned()
            .collect())
    }

    async fn for_project(&self, project: ProjectId) -> Result<Vec<Application>, RippleError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|a| a.project_id() == project)
            .cloned()
            .collect())
    }

    async fn for_position(
        &self,
        project: ProjectId,
        position: PositionId,
    ) -> Result<Vec<Application>, RippleError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|a| a.project_id() == project && a.position_id() == position)
            .cloned()
            .collect())
    }

    async fn remove(&self, id: ApplicationId) -> Result<(), RippleError> {
        self.rows.lock().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCollaborations {
    rows: Mutex<HashMap<CollaborationId, Collaboration>>,
}

impl InMemoryCollaborations {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollaborationRepository for InMemoryCollaborations {
    async fn get(&self, id: CollaborationId) -> Result<Option<Collaboration>, RippleError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, collaboration: Collaboration) -> Result<(), RippleError> {
        self.rows
            .lock()
            .await
            .insert(collaboration.id(), collaboration);
        Ok(())
    }

    async fn with_collaborator(
        &self,
        collaborator: ContributorId,
    ) -> Result<Vec<Collaboration>, RippleError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|c| c.collaborator_id() == collaborator)
            .cloned()
            .collect())
    }

    async fn for_project(&self, project: ProjectId) -> Result<Vec<Collaboration>, RippleError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|c| c.project_id() == project)
            .cloned()
            .collect())
    }

    async fn remove(&self, id: CollaborationId) -> Result<(), RippleError> {
        self.rows.lock().await.remove(&id);
        Ok(())
    }
}

/// In-memory stand-in for the external account system.
#[derive(Default)]
pub struct InMemoryAccounts {
    rows: Mutex<HashSet<AccountId>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_account(&self, id: AccountId) {
        self.rows.lock().await.insert(id);
    }

    pub async fn has_account(&self, id: AccountId) -> bool {
        self.rows.lock().await.contains(&id)
    }
}

#[async_trait]
impl AccountService for InMemoryAccounts {
    async fn remove_account(&self, account_id: AccountId) -> Result<(), RippleError> {
        // Idempotent by contract.
        self.rows.lock().await.remove(&account_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[tokio::test]
    async fn remove_of_missing_rows_is_a_noop() {
        let contributors = InMemoryContributors::new();
        let projects = InMemoryProjects::new();
        let applications = InMemoryApplications::new();
        let collaborations = InMemoryCollaborations::new();

        contributors
            .remove(ContributorId::from_ulid(Ulid::new()))
            .await
            .unwrap();
        projects.remove(ProjectId::from_ulid(Ulid::new())).await.unwrap();
        applications
            .remove(ApplicationId::from_ulid(Ulid::new()))
            .await
            .unwrap();
        collaborations
            .remove(CollaborationId::from_ulid(Ulid::new()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn scoped_queries_filter_by_owner() {
        let projects = InMemoryProjects::new();
        let author = ContributorId::from_ulid(Ulid::new());
        let other = ContributorId::from_ulid(Ulid::new());

        let mine = Project::new(ProjectId::from_ulid(Ulid::new()), author, "mine");
        let theirs = Project::new(ProjectId::from_ulid(Ulid::new()), other, "theirs");
        projects.insert(mine.clone()).await.unwrap();
        projects.insert(theirs).await.unwrap();

        let authored = projects.authored_by(author).await.unwrap();
        assert_eq!(authored.len(), 1);
        assert_eq!(authored[0].id(), mine.id());
    }

    #[tokio::test]
    async fn account_removal_is_idempotent() {
        let accounts = InMemoryAccounts::new();
        let id = AccountId::from_ulid(Ulid::new());
        accounts.create_account(id).await;

        accounts.remove_account(id).await.unwrap();
        accounts.remove_account(id).await.unwrap();

        assert!(!accounts.has_account(id).await);
    }
}
