//! Error types for directory value validation.

use thiserror::Error;

/// Errors returned while constructing directory records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The client display name is empty after trimming.
    #[error("client display name must not be empty")]
    EmptyDisplayName,
}
