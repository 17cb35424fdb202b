//! Adapter implementations for payable ports.

pub mod memory;
