//! In-memory repository for project graphs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{CascadeSummary, Project, ProjectGraph, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::proposal::domain::ProposalId;

/// Thread-safe in-memory project graph repository.
///
/// Each call holds the write lock for its whole duration, which gives the
/// all-or-nothing behaviour the port requires.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    graphs: HashMap<ProjectId, ProjectGraph>,
    insertion_order: Vec<ProjectId>,
}

impl InMemoryProjectState {
    fn ensure_all_exist(&self, ids: impl IntoIterator<Item = ProjectId>) -> ProjectRepositoryResult<()> {
        ids.into_iter()
            .find(|id| !self.graphs.contains_key(id))
            .map_or(Ok(()), |missing| Err(ProjectRepositoryError::NotFound(missing)))
    }
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store_graph(&self, graph: &ProjectGraph) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let project_id = graph.project.id();
        if state.graphs.contains_key(&project_id) {
            return Err(ProjectRepositoryError::DuplicateProject(project_id));
        }
        state.graphs.insert(project_id, graph.clone());
        state.insertion_order.push(project_id);
        Ok(())
    }

    async fn update_graphs(&self, graphs: &[ProjectGraph]) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.ensure_all_exist(graphs.iter().map(|graph| graph.project.id()))?;
        for graph in graphs {
            state.graphs.insert(graph.project.id(), graph.clone());
        }
        Ok(())
    }

    async fn remove_graphs(
        &self,
        project_ids: &[ProjectId],
    ) -> ProjectRepositoryResult<CascadeSummary> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.ensure_all_exist(project_ids.iter().copied())?;
        let mut summary = CascadeSummary::default();
        for id in project_ids {
            if let Some(graph) = state.graphs.remove(id) {
                summary = summary.merge(graph.summary());
            }
        }
        state
            .insertion_order
            .retain(|id| !project_ids.contains(id));
        Ok(summary)
    }

    async fn find_project(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.graphs.get(&id).map(|graph| graph.project.clone()))
    }

    async fn find_graph(&self, id: ProjectId) -> ProjectRepositoryResult<Option<ProjectGraph>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.graphs.get(&id).cloned())
    }

    async fn graphs_for_proposal(
        &self,
        proposal_id: ProposalId,
    ) -> ProjectRepositoryResult<Vec<ProjectGraph>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.graphs.get(id))
            .filter(|graph| graph.project.proposal_id() == Some(proposal_id))
            .cloned()
            .collect())
    }
}
