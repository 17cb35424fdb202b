//! Repository port for project graphs.
//!
//! Every multi-row operation is atomic: either all rows of the call are
//! written or removed, or none are.

use crate::project::domain::{CascadeSummary, Project, ProjectGraph, ProjectId};
use crate::proposal::domain::ProposalId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project graph persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project with its phases and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the project
    /// identifier already exists.
    async fn store_graph(&self, graph: &ProjectGraph) -> ProjectRepositoryResult<()>;

    /// Replaces the stored rows of several existing graphs.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when any project does not
    /// exist; nothing is written in that case.
    async fn update_graphs(&self, graphs: &[ProjectGraph]) -> ProjectRepositoryResult<()>;

    /// Deletes projects together with their phases and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when any project does not
    /// exist; nothing is removed in that case.
    async fn remove_graphs(&self, project_ids: &[ProjectId])
    -> ProjectRepositoryResult<CascadeSummary>;

    /// Finds a project row by identifier.
    async fn find_project(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Loads a project with its phases and tasks.
    async fn find_graph(&self, id: ProjectId) -> ProjectRepositoryResult<Option<ProjectGraph>>;

    /// Loads every graph whose project links to the proposal, oldest first.
    async fn graphs_for_proposal(
        &self,
        proposal_id: ProposalId,
    ) -> ProjectRepositoryResult<Vec<ProjectGraph>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
