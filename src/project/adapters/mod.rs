//! Adapter implementations for template and project ports.

pub mod memory;
