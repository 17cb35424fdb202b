//! Billwright: proposal-to-payable billing core.
//!
//! This crate drives a commercial proposal through its lifecycle, expands
//! project templates into dated plans, turns approved billable time into
//! draft invoices, and derives a monthly statutory tax obligation from every
//! issued invoice with traceable lineage.
//!
//! # Architecture
//!
//! Billwright follows hexagonal architecture principles. Each bounded
//! context splits into:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Async trait interfaces for persistence and collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory stores)
//! - **Services**: Orchestration of domain operations over ports
//!
//! # Modules
//!
//! - [`directory`]: Company, client and user identities and the client lookup
//! - [`proposal`]: Proposal status machine and project cascades
//! - [`project`]: Templates and dated project instantiation
//! - [`billing`]: Time entry approval, draft invoices and finalization
//! - [`payable`]: Statutory tax sub-ledger and payable maintenance
//! - [`app`]: Composition root and command surface
//! - [`settings`] and [`telemetry`]: Configuration and logging

#[macro_use]
mod macros;

pub mod app;
pub mod audit;
pub mod billing;
pub mod directory;
pub mod error;
pub mod payable;
pub mod project;
pub mod proposal;
pub mod settings;
pub mod telemetry;
