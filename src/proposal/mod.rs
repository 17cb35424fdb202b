//! Proposal lifecycle management.
//!
//! A proposal moves through a status machine from draft to closure. Some
//! transitions cascade onto the projects and tasks instantiated for the
//! proposal: reopening a closed proposal or declining it removes them, while
//! canceling it keeps them but marks them canceled. The module follows
//! hexagonal architecture:
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
