//! Shared party identities and the client directory collaborator.
//!
//! Companies, clients and users are owned by external CRUD concerns. The
//! billing core only needs their identifiers and a read-mostly client lookup,
//! which this module exposes as a port with an in-memory adapter.

pub mod adapters;
pub mod domain;
pub mod ports;
