//! Service layer for proposal status transitions and their cascades.

use crate::error::ErrorKind;
use crate::project::{
    domain::CascadeSummary,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::proposal::{
    domain::{
        NewProposal, ParseProposalStatusError, Proposal, ProposalCascade, ProposalDomainError,
        ProposalId, ProposalStatus, ProposalTransition,
    },
    ports::{ProposalRepository, ProposalRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for moving a proposal to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionProposalRequest {
    proposal_id: ProposalId,
    target_status: String,
    reason: Option<String>,
}

impl TransitionProposalRequest {
    /// Creates a request targeting the given status string.
    #[must_use]
    pub fn new(proposal_id: ProposalId, target_status: impl Into<String>) -> Self {
        Self {
            proposal_id,
            target_status: target_status.into(),
            reason: None,
        }
    }

    /// Sets the free-text reason recorded on decline or cancel.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalTransitionOutcome {
    /// The proposal after the transition.
    pub proposal: Proposal,
    /// Previous and new status with the cascade applied.
    pub transition: ProposalTransition,
    /// Rows removed or canceled by the cascade.
    pub affected: CascadeSummary,
}

/// Service-level errors for proposal lifecycle operations.
#[derive(Debug, Error)]
pub enum ProposalLifecycleError {
    /// Domain validation failed or the transition was refused.
    #[error(transparent)]
    Domain(#[from] ProposalDomainError),
    /// The requested status string is not a proposal status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseProposalStatusError),
    /// No proposal exists with the given identifier.
    #[error("proposal {0} not found")]
    NotFound(ProposalId),
    /// Proposal persistence failed.
    #[error(transparent)]
    Repository(#[from] ProposalRepositoryError),
    /// The project cascade failed; the proposal was not updated.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
}

impl ProposalLifecycleError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ProposalDomainError::UnchangedStatus { .. }) => ErrorKind::Conflict,
            Self::Domain(_) | Self::InvalidStatus(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) | Self::Projects(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for proposal lifecycle operations.
pub type ProposalLifecycleResult<T> = Result<T, ProposalLifecycleError>;

/// Proposal lifecycle orchestration service.
#[derive(Clone)]
pub struct ProposalLifecycleService<P, G, C>
where
    P: ProposalRepository,
    G: ProjectRepository,
    C: Clock + Send + Sync,
{
    proposals: Arc<P>,
    projects: Arc<G>,
    clock: Arc<C>,
}

impl<P, G, C> ProposalLifecycleService<P, G, C>
where
    P: ProposalRepository,
    G: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(proposals: Arc<P>, projects: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            proposals,
            projects,
            clock,
        }
    }

    /// Drafts and stores a new proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalLifecycleError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn draft(&self, params: NewProposal) -> ProposalLifecycleResult<Proposal> {
        let proposal = Proposal::new(params, &*self.clock)?;
        self.proposals.store(&proposal).await?;
        Ok(proposal)
    }

    /// Retrieves a proposal by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalLifecycleError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: ProposalId) -> ProposalLifecycleResult<Option<Proposal>> {
        Ok(self.proposals.find_by_id(id).await?)
    }

    /// Moves a proposal to a new status and applies the project cascade.
    ///
    /// The cascade is decided from the previous status and runs as one
    /// atomic project-store call before the proposal itself is saved, so a
    /// failed cascade leaves the proposal in its previous status.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalLifecycleError::InvalidStatus`] for an unknown
    /// status string, [`ProposalLifecycleError::NotFound`] for an unknown
    /// proposal, [`ProposalDomainError::UnchangedStatus`] when the proposal
    /// already has the target status, or persistence errors.
    pub async fn transition(
        &self,
        request: TransitionProposalRequest,
    ) -> ProposalLifecycleResult<ProposalTransitionOutcome> {
        let target = ProposalStatus::try_from(request.target_status.as_str())?;
        let mut proposal = self
            .proposals
            .find_by_id(request.proposal_id)
            .await?
            .ok_or(ProposalLifecycleError::NotFound(request.proposal_id))?;

        let transition = proposal.transition_to(target, request.reason.as_deref(), &*self.clock)?;
        let affected = self.apply_cascade(proposal.id(), transition.cascade).await?;
        self.proposals.update(&proposal).await?;

        tracing::info!(
            proposal_id = %proposal.id(),
            from = %transition.from,
            to = %transition.to,
            cascade = ?transition.cascade,
            projects = affected.projects,
            tasks = affected.tasks,
            "proposal status changed"
        );

        Ok(ProposalTransitionOutcome {
            proposal,
            transition,
            affected,
        })
    }

    async fn apply_cascade(
        &self,
        proposal_id: ProposalId,
        cascade: ProposalCascade,
    ) -> ProposalLifecycleResult<CascadeSummary> {
        if cascade == ProposalCascade::None {
            return Ok(CascadeSummary::default());
        }

        let mut graphs = self.projects.graphs_for_proposal(proposal_id).await?;
        if graphs.is_empty() {
            return Ok(CascadeSummary::default());
        }

        match cascade {
            ProposalCascade::None => Ok(CascadeSummary::default()),
            ProposalCascade::RemoveProjects => {
                let ids: Vec<_> = graphs.iter().map(|graph| graph.project.id()).collect();
                Ok(self.projects.remove_graphs(&ids).await?)
            }
            ProposalCascade::CancelProjects => {
                for graph in &mut graphs {
                    graph.cancel_negotiation(&*self.clock);
                }
                self.projects.update_graphs(&graphs).await?;
                Ok(graphs
                    .iter()
                    .map(|graph| CascadeSummary {
                        projects: 1,
                        phases: 0,
                        tasks: graph.tasks.len(),
                    })
                    .fold(CascadeSummary::default(), CascadeSummary::merge))
            }
        }
    }
}
