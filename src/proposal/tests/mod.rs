//! Unit tests for the proposal module.
//!
//! Domain tests cover the status machine and cascade decisions; lifecycle
//! tests drive the service against in-memory repositories.

mod lifecycle_tests;
