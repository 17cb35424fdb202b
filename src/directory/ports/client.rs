//! Client lookup port.

use crate::directory::domain::{Client, ClientId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for client directory operations.
pub type ClientDirectoryResult<T> = Result<T, ClientDirectoryError>;

/// Read/write access to client records owned by the external CRUD layer.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Registers a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientDirectoryError::DuplicateClient`] when the identifier
    /// is already registered.
    async fn store(&self, client: &Client) -> ClientDirectoryResult<()>;

    /// Finds a client by identifier.
    ///
    /// Returns `None` when the client does not exist.
    async fn find_by_id(&self, id: ClientId) -> ClientDirectoryResult<Option<Client>>;
}

/// Errors returned by client directory implementations.
#[derive(Debug, Clone, Error)]
pub enum ClientDirectoryError {
    /// A client with the same identifier already exists.
    #[error("duplicate client identifier: {0}")]
    DuplicateClient(ClientId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ClientDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
