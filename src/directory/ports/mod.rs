//! Port contracts for directory lookups.

pub mod client;

pub use client::{ClientDirectory, ClientDirectoryError, ClientDirectoryResult};
