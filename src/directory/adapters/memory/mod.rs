//! In-memory directory adapters.

mod client;

pub use client::InMemoryClientDirectory;
