//! Adapter implementations for billing ports.

pub mod memory;
