//! Proposal status, contracting type and service type enumerations.

use super::{ParseContractingTypeError, ParseProposalStatusError, ParseServiceTypeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    /// Proposal is being written.
    Draft,
    /// Proposal was sent to the client.
    Sent,
    /// Proposal was sent again without changes.
    Resent,
    /// Proposal was revised after client feedback.
    Revised,
    /// Client accepted the proposal.
    Closed,
    /// Client declined the proposal.
    Declined,
    /// Negotiation was canceled.
    Canceled,
}

impl ProposalStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Sent,
        Self::Resent,
        Self::Revised,
        Self::Closed,
        Self::Declined,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Resent => "RESENT",
            Self::Revised => "REVISED",
            Self::Closed => "CLOSED",
            Self::Declined => "DECLINED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Returns whether a transition to `target` is allowed.
    ///
    /// Any status may move to any other status; only repeating the current
    /// status is refused.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self != target
    }

    /// Returns whether the status is still under negotiation.
    #[must_use]
    pub const fn is_negotiating(self) -> bool {
        matches!(self, Self::Draft | Self::Sent | Self::Resent | Self::Revised)
    }

    /// Returns whether entering this status records a free-text reason.
    #[must_use]
    pub const fn records_reason(self) -> bool {
        matches!(self, Self::Declined | Self::Canceled)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProposalStatus {
    type Error = ParseProposalStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseProposalStatusError(value.to_owned()))
    }
}

/// How the proposal's work is contracted and billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractingType {
    /// Billed per approved hour.
    Hours,
    /// Fixed price for the whole scope.
    Fixed,
    /// Recurring monthly fee.
    Monthly,
}

impl ContractingType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hours => "HOURS",
            Self::Fixed => "FIXED",
            Self::Monthly => "MONTHLY",
        }
    }

    /// Returns whether approved time is billed directly.
    #[must_use]
    pub const fn bills_by_the_hour(self) -> bool {
        matches!(self, Self::Hours)
    }
}

impl TryFrom<&str> for ContractingType {
    type Error = ParseContractingTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HOURS" => Ok(Self::Hours),
            "FIXED" => Ok(Self::Fixed),
            "MONTHLY" => Ok(Self::Monthly),
            _ => Err(ParseContractingTypeError(value.to_owned())),
        }
    }
}

/// Kind of service a proposal offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    /// Advisory engagement.
    Consulting,
    /// Building new software.
    SoftwareDevelopment,
    /// Ongoing maintenance of delivered software.
    Maintenance,
    /// Operational support.
    Support,
    /// Training sessions.
    Training,
}

impl ServiceType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consulting => "CONSULTING",
            Self::SoftwareDevelopment => "SOFTWARE_DEVELOPMENT",
            Self::Maintenance => "MAINTENANCE",
            Self::Support => "SUPPORT",
            Self::Training => "TRAINING",
        }
    }

    /// Returns the human-readable label used in project names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Consulting => "Consulting",
            Self::SoftwareDevelopment => "Software development",
            Self::Maintenance => "Maintenance",
            Self::Support => "Support",
            Self::Training => "Training",
        }
    }
}

impl TryFrom<&str> for ServiceType {
    type Error = ParseServiceTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONSULTING" => Ok(Self::Consulting),
            "SOFTWARE_DEVELOPMENT" => Ok(Self::SoftwareDevelopment),
            "MAINTENANCE" => Ok(Self::Maintenance),
            "SUPPORT" => Ok(Self::Support),
            "TRAINING" => Ok(Self::Training),
            _ => Err(ParseServiceTypeError(value.to_owned())),
        }
    }
}
