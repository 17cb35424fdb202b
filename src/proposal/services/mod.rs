//! Application services for proposal lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    ProposalLifecycleError, ProposalLifecycleResult, ProposalLifecycleService,
    ProposalTransitionOutcome, TransitionProposalRequest,
};
