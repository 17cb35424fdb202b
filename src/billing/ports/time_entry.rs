//! Repository port for time entries.

use crate::billing::domain::{TimeEntry, TimeEntryId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for time entry repository operations.
pub type TimeEntryRepositoryResult<T> = Result<T, TimeEntryRepositoryError>;

/// Time entry persistence contract.
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// Stores a new time entry.
    ///
    /// # Errors
    ///
    /// Returns [`TimeEntryRepositoryError::DuplicateTimeEntry`] when the
    /// identifier already exists.
    async fn store(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()>;

    /// Persists changes to an existing time entry.
    ///
    /// # Errors
    ///
    /// Returns [`TimeEntryRepositoryError::NotFound`] when the entry does
    /// not exist.
    async fn update(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()>;

    /// Finds a time entry by identifier.
    async fn find_by_id(&self, id: TimeEntryId) -> TimeEntryRepositoryResult<Option<TimeEntry>>;
}

/// Errors returned by time entry repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TimeEntryRepositoryError {
    /// A time entry with the same identifier already exists.
    #[error("duplicate time entry identifier: {0}")]
    DuplicateTimeEntry(TimeEntryId),

    /// The time entry was not found.
    #[error("time entry not found: {0}")]
    NotFound(TimeEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TimeEntryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
