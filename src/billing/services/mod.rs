//! Billing orchestration services.

mod approval;
mod history;
mod ledger;

pub use approval::{
    ApprovalOutcome, ApproveTimeEntryRequest, RejectTimeEntryRequest, RejectionOutcome,
    ReleasedContribution, TimeEntryApprovalError, TimeEntryApprovalResult,
    TimeEntryApprovalService,
};
pub use ledger::{
    InvoiceLedgerError, InvoiceLedgerResult, InvoiceLedgerService, IssueInvoiceOutcome,
    IssueInvoiceRequest,
};
