//! Structural side effects of proposal transitions on dependent projects.

use super::ProposalStatus;
use serde::{Deserialize, Serialize};

/// What a proposal transition does to the projects linked to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalCascade {
    /// Linked projects are left untouched.
    None,
    /// Linked projects, their phases and their tasks are deleted.
    RemoveProjects,
    /// Linked projects are marked negotiation-canceled and their tasks
    /// canceled; no row is deleted.
    CancelProjects,
}

impl ProposalCascade {
    /// Decides the cascade for a transition from `from` to `to`.
    ///
    /// Declining always removes projects, canceling always soft-cancels
    /// them, and reopening a closed proposal into negotiation removes them.
    #[must_use]
    pub const fn for_transition(from: ProposalStatus, to: ProposalStatus) -> Self {
        match (from, to) {
            (_, ProposalStatus::Declined) => Self::RemoveProjects,
            (_, ProposalStatus::Canceled) => Self::CancelProjects,
            (ProposalStatus::Closed, target) if target.is_negotiating() => Self::RemoveProjects,
            _ => Self::None,
        }
    }
}
