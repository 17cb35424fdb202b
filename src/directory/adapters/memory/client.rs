//! In-memory client directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{Client, ClientId},
    ports::{ClientDirectory, ClientDirectoryError, ClientDirectoryResult},
};

/// Thread-safe in-memory client directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientDirectory {
    clients: Arc<RwLock<HashMap<ClientId, Client>>>,
}

impl InMemoryClientDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn store(&self, client: &Client) -> ClientDirectoryResult<()> {
        let mut clients = self.clients.write().map_err(|err| {
            ClientDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if clients.contains_key(&client.id()) {
            return Err(ClientDirectoryError::DuplicateClient(client.id()));
        }
        clients.insert(client.id(), client.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ClientId) -> ClientDirectoryResult<Option<Client>> {
        let clients = self.clients.read().map_err(|err| {
            ClientDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(clients.get(&id).cloned())
    }
}
