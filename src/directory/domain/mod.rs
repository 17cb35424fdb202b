//! Domain types for company, client and user identities.

mod client;
mod error;
mod ids;

pub use client::Client;
pub use error::DirectoryDomainError;
pub use ids::{ClientId, CompanyId, UserId};
