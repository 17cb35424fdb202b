//! Unit tests for the billing module.
//!
//! Approval tests drive accrual and release through in-memory adapters;
//! ledger tests cover invoice finalization with a mocked tax port.

mod ledger_tests;
