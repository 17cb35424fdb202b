//! In-memory repository for time entries.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::billing::{
    domain::{TimeEntry, TimeEntryId},
    ports::{TimeEntryRepository, TimeEntryRepositoryError, TimeEntryRepositoryResult},
};

/// Thread-safe in-memory time entry repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimeEntryRepository {
    entries: Arc<RwLock<HashMap<TimeEntryId, TimeEntry>>>,
}

impl InMemoryTimeEntryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TimeEntryRepositoryError {
    TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TimeEntryRepository for InMemoryTimeEntryRepository {
    async fn store(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        if entries.contains_key(&entry.id()) {
            return Err(TimeEntryRepositoryError::DuplicateTimeEntry(entry.id()));
        }
        entries.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        let slot = entries
            .get_mut(&entry.id())
            .ok_or(TimeEntryRepositoryError::NotFound(entry.id()))?;
        *slot = entry.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TimeEntryId) -> TimeEntryRepositoryResult<Option<TimeEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.get(&id).cloned())
    }
}
