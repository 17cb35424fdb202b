//! Unit tests for the project module.
//!
//! Covers calendar resolution, graph expansion and the instantiation
//! service against in-memory adapters.

mod schedule_tests;
