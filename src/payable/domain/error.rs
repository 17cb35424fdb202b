//! Error types for payable validation and state transitions.

use super::{AccountPayableId, AccountPayableStatus, Competency};
use crate::error::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by payable domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayableDomainError {
    /// A required name is blank.
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Monetary amounts must not be negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// The month is outside 1..=12.
    #[error("invalid competency {month:02}/{year}")]
    InvalidCompetency {
        /// Calendar year.
        year: i32,
        /// Calendar month.
        month: u32,
    },

    /// The due date of a competency falls outside the calendar.
    #[error("due date for competency {0} is out of range")]
    DueDateOutOfRange(Competency),

    /// Only open obligations accept contributions.
    #[error("account payable {0} is closed to new contributions")]
    NotAccruable(AccountPayableId),

    /// The status machine refused the transition.
    #[error("account payable {account_payable_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Obligation identifier.
        account_payable_id: AccountPayableId,
        /// Current status.
        from: AccountPayableStatus,
        /// Requested status.
        to: AccountPayableStatus,
    },
}

impl PayableDomainError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAccruable(_) | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::EmptyName(_)
            | Self::NegativeAmount(_)
            | Self::InvalidCompetency { .. }
            | Self::DueDateOutOfRange(_) => ErrorKind::Validation,
        }
    }
}

/// Error returned while parsing an obligation status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown account payable status: {0}")]
pub struct ParseAccountPayableStatusError(pub String);
