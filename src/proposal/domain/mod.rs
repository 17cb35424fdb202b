//! Domain model for proposals and their status machine.

mod cascade;
mod error;
mod ids;
mod proposal;
mod status;

pub use cascade::ProposalCascade;
pub use error::{
    ParseContractingTypeError, ParseProposalStatusError, ParseServiceTypeError,
    ProposalDomainError,
};
pub use ids::ProposalId;
pub use proposal::{NewProposal, Proposal, ProposalTransition};
pub use status::{ContractingType, ProposalStatus, ServiceType};
