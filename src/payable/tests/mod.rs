//! Unit tests for the payable module.
//!
//! Sub-ledger tests post invoices against in-memory adapters; maintenance
//! tests cover settlement and the due-date sweep.

mod maintenance_tests;
