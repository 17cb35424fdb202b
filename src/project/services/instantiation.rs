//! Service layer expanding templates into dated project graphs.

use crate::directory::{
    domain::ClientId,
    ports::{ClientDirectory, ClientDirectoryError},
};
use crate::error::ErrorKind;
use crate::project::{
    domain::{
        PlanContext, ProjectDomainError, ProjectGraph, ProjectId, TemplateId,
        project_display_name,
    },
    ports::{
        ProjectRepository, ProjectRepositoryError, TemplateRepository, TemplateRepositoryError,
    },
};
use crate::proposal::{
    domain::ProposalId,
    ports::{ProposalRepository, ProposalRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for instantiating a template for a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantiateTemplateRequest {
    /// Proposal the project is created for.
    pub proposal_id: ProposalId,
    /// Template to expand.
    pub template_id: TemplateId,
    /// Anchor date of the project schedule.
    pub start_date: NaiveDate,
}

impl InstantiateTemplateRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(proposal_id: ProposalId, template_id: TemplateId, start_date: NaiveDate) -> Self {
        Self {
            proposal_id,
            template_id,
            start_date,
        }
    }
}

/// Service-level errors for template instantiation.
#[derive(Debug, Error)]
pub enum TemplateInstantiationError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// The proposal does not exist.
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),
    /// The template does not exist.
    #[error("project template {0} not found")]
    TemplateNotFound(TemplateId),
    /// The proposal's client does not exist.
    #[error("client {0} not found")]
    ClientNotFound(ClientId),
    /// Proposal lookup failed.
    #[error(transparent)]
    Proposals(#[from] ProposalRepositoryError),
    /// Template lookup failed.
    #[error(transparent)]
    Templates(#[from] TemplateRepositoryError),
    /// Project persistence failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// Client lookup failed.
    #[error(transparent)]
    Clients(#[from] ClientDirectoryError),
}

impl TemplateInstantiationError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::ProposalNotFound(_) | Self::TemplateNotFound(_) | Self::ClientNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Proposals(_) | Self::Templates(_) | Self::Projects(_) | Self::Clients(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Result type for template instantiation operations.
pub type TemplateInstantiationResult<T> = Result<T, TemplateInstantiationError>;

/// Expands project templates into dated projects for proposals.
#[derive(Clone)]
pub struct TemplateInstantiationService<P, T, G, D, C>
where
    P: ProposalRepository,
    T: TemplateRepository,
    G: ProjectRepository,
    D: ClientDirectory,
    C: Clock + Send + Sync,
{
    proposals: Arc<P>,
    templates: Arc<T>,
    projects: Arc<G>,
    clients: Arc<D>,
    clock: Arc<C>,
}

impl<P, T, G, D, C> TemplateInstantiationService<P, T, G, D, C>
where
    P: ProposalRepository,
    T: TemplateRepository,
    G: ProjectRepository,
    D: ClientDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new instantiation service.
    #[must_use]
    pub const fn new(
        proposals: Arc<P>,
        templates: Arc<T>,
        projects: Arc<G>,
        clients: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            proposals,
            templates,
            projects,
            clients,
            clock,
        }
    }

    /// Creates a project, its phases and its tasks from a template.
    ///
    /// The project is named after the upper-cased client display name and
    /// the proposal's service label. Tasks demand time logging when the
    /// proposal is contracted by the hour. Calling this twice for the same
    /// proposal creates two projects.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateInstantiationError`] when the proposal, template or
    /// client is missing, a date overflows, or persistence fails. Nothing is
    /// stored on error.
    pub async fn instantiate(
        &self,
        request: InstantiateTemplateRequest,
    ) -> TemplateInstantiationResult<ProjectGraph> {
        let proposal = self
            .proposals
            .find_by_id(request.proposal_id)
            .await?
            .ok_or(TemplateInstantiationError::ProposalNotFound(request.proposal_id))?;
        let template = self
            .templates
            .find_by_id(request.template_id)
            .await?
            .ok_or(TemplateInstantiationError::TemplateNotFound(request.template_id))?;
        let client = self
            .clients
            .find_by_id(proposal.client_id())
            .await?
            .ok_or(TemplateInstantiationError::ClientNotFound(proposal.client_id()))?;

        let context = PlanContext {
            company_id: proposal.company_id(),
            client_id: client.id(),
            proposal_id: proposal.id(),
            project_name: project_display_name(
                client.display_name(),
                proposal.service_type().label(),
            ),
            start_date: request.start_date,
            requires_time_logging: proposal.contracting_type().bills_by_the_hour(),
        };

        let graph = ProjectGraph::from_template(&template, &context, &*self.clock)?;
        self.projects.store_graph(&graph).await?;

        tracing::info!(
            proposal_id = %proposal.id(),
            template_id = %template.id(),
            project_id = %graph.project.id(),
            phases = graph.phases.len(),
            tasks = graph.tasks.len(),
            legacy = template.is_legacy(),
            "instantiated project from template"
        );
        Ok(graph)
    }

    /// Loads a project with its phases and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateInstantiationError::Projects`] when the lookup fails.
    pub async fn find_graph(
        &self,
        project_id: ProjectId,
    ) -> TemplateInstantiationResult<Option<ProjectGraph>> {
        Ok(self.projects.find_graph(project_id).await?)
    }
}
