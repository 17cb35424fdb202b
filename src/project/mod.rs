//! Project templates and their dated instantiation.
//!
//! A reusable template (ordered phases holding ordered tasks with duration,
//! offset and predecessor rules) expands into a concrete project graph with
//! calendar dates. Proposal transitions later remove or cancel that graph.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
