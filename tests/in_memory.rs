//! In-memory integration tests for the command surface.
//!
//! Tests are organized into modules by workflow:
//! - `project_flow_tests`: proposal transitions and template instantiation
//! - `billing_flow_tests`: time entry approval into draft invoices
//! - `tax_flow_tests`: invoice finalization into the tax sub-ledger

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod in_memory {
    pub mod helpers;

    mod billing_flow_tests;
    mod project_flow_tests;
    mod tax_flow_tests;
}
