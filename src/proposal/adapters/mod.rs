//! Adapter implementations for proposal ports.

pub mod memory;
