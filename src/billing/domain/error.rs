//! Error types for billing validation and state transitions.

use super::{InvoiceId, InvoiceStatus, TimeEntryId};
use crate::error::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by billing domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BillingDomainError {
    /// Hours must be strictly positive.
    #[error("time entry hours must be positive, got {0}")]
    InvalidHours(Decimal),

    /// Hourly rates must be strictly positive.
    #[error("hourly rate must be positive, got {0}")]
    InvalidHourlyRate(Decimal),

    /// A time entry has no project, proposal or client link.
    #[error("time entry must link to a project, proposal or client")]
    UnlinkedTimeEntry,

    /// The time entry is already approved.
    #[error("time entry {0} is already approved")]
    AlreadyApproved(TimeEntryId),

    /// The time entry is already rejected.
    #[error("time entry {0} is already rejected")]
    AlreadyRejected(TimeEntryId),

    /// Monetary amounts must not be negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// The due date precedes the emission date.
    #[error("due date {due} precedes emission date {emission}")]
    DueBeforeEmission {
        /// Emission date.
        emission: chrono::NaiveDate,
        /// Due date.
        due: chrono::NaiveDate,
    },

    /// Timesheet invoices are only created by time-entry approval.
    #[error("timesheet invoices cannot be created manually")]
    ManualTimesheetInvoice,

    /// Only provisioned timesheet invoices accept or release time entries.
    #[error("invoice {0} is not a provisioned timesheet invoice")]
    NotAccruable(InvoiceId),

    /// The invoice status machine refused the transition.
    #[error("invoice {invoice_id} cannot move from {from} to {to}")]
    InvalidInvoiceTransition {
        /// Invoice identifier.
        invoice_id: InvoiceId,
        /// Current status.
        from: InvoiceStatus,
        /// Requested status.
        to: InvoiceStatus,
    },
}

impl BillingDomainError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyApproved(_)
            | Self::AlreadyRejected(_)
            | Self::NotAccruable(_)
            | Self::InvalidInvoiceTransition { .. } => ErrorKind::Conflict,
            Self::InvalidHours(_)
            | Self::InvalidHourlyRate(_)
            | Self::UnlinkedTimeEntry
            | Self::NegativeAmount(_)
            | Self::DueBeforeEmission { .. }
            | Self::ManualTimesheetInvoice => ErrorKind::Validation,
        }
    }
}

/// Error returned while parsing a time entry status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown time entry status: {0}")]
pub struct ParseTimeEntryStatusError(pub String);

/// Error returned while parsing an invoice status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invoice status: {0}")]
pub struct ParseInvoiceStatusError(pub String);
