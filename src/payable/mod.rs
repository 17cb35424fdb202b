//! Statutory tax sub-ledger and accounts-payable maintenance.
//!
//! Issued invoices contribute a fixed percentage of their value to one
//! obligation record per company, fixed supplier and competency month. Each
//! contribution is linked to its invoice so an invoice posts at most once.
//! A periodic sweep promotes obligations as their due date approaches. The
//! module follows hexagonal architecture:
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
