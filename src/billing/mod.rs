//! Time-entry approval and invoice bookkeeping.
//!
//! Approved billable time accrues into draft (provisioned timesheet)
//! invoices, one per company, client and proposal bucket. Rejecting an
//! approved entry reverses its contribution. Issuing an invoice finalizes it
//! and hands it to the tax sub-ledger through the [`ports::TaxPosting`] port.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
