//! Error types for proposal validation and parsing.

use super::{ProposalId, ProposalStatus};
use thiserror::Error;

/// Errors returned by proposal domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProposalDomainError {
    /// The proposal title is empty after trimming.
    #[error("proposal title must not be empty")]
    EmptyTitle,

    /// A transition targeted the status the proposal already has.
    #[error("proposal {proposal_id} is already {status}")]
    UnchangedStatus {
        /// Proposal identifier.
        proposal_id: ProposalId,
        /// Current and requested status.
        status: ProposalStatus,
    },

    /// A proposal cannot be its own maintenance counterpart.
    #[error("proposal {0} cannot reference itself as maintenance counterpart")]
    SelfMaintenanceLink(ProposalId),
}

/// Error returned while parsing a proposal status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown proposal status: {0}")]
pub struct ParseProposalStatusError(pub String);

/// Error returned while parsing a contracting type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown contracting type: {0}")]
pub struct ParseContractingTypeError(pub String);

/// Error returned while parsing a service type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service type: {0}")]
pub struct ParseServiceTypeError(pub String);
