//! In-memory expense catalog.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::directory::domain::CompanyId;
use crate::payable::{
    domain::{ExpenseClassification, Supplier},
    ports::{ExpenseCatalog, ExpenseCatalogError, ExpenseCatalogResult},
};

/// Thread-safe in-memory catalog of suppliers and classifications.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExpenseCatalog {
    state: Arc<RwLock<CatalogState>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    suppliers: Vec<Supplier>,
    classifications: Vec<ExpenseClassification>,
}

impl InMemoryExpenseCatalog {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored suppliers.
    ///
    /// # Errors
    ///
    /// Returns [`ExpenseCatalogError::Persistence`] when the lock is
    /// poisoned.
    pub fn supplier_count(&self) -> ExpenseCatalogResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.suppliers.len())
    }

    /// Returns the number of stored classifications.
    ///
    /// # Errors
    ///
    /// Returns [`ExpenseCatalogError::Persistence`] when the lock is
    /// poisoned.
    pub fn classification_count(&self) -> ExpenseCatalogResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.classifications.len())
    }
}

fn lock_error(err: impl std::fmt::Display) -> ExpenseCatalogError {
    ExpenseCatalogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ExpenseCatalog for InMemoryExpenseCatalog {
    async fn find_or_create_supplier(&self, candidate: Supplier) -> ExpenseCatalogResult<Supplier> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(existing) = state.suppliers.iter().find(|supplier| {
            supplier.company_id() == candidate.company_id() && supplier.name() == candidate.name()
        }) {
            return Ok(existing.clone());
        }
        state.suppliers.push(candidate.clone());
        Ok(candidate)
    }

    async fn find_or_create_classification(
        &self,
        candidate: ExpenseClassification,
    ) -> ExpenseCatalogResult<ExpenseClassification> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(existing) = state.classifications.iter().find(|classification| {
            classification.company_id() == candidate.company_id()
                && classification.name() == candidate.name()
        }) {
            return Ok(existing.clone());
        }
        state.classifications.push(candidate.clone());
        Ok(candidate)
    }

    async fn find_supplier_by_name(
        &self,
        company_id: CompanyId,
        name: &str,
    ) -> ExpenseCatalogResult<Option<Supplier>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .suppliers
            .iter()
            .find(|supplier| supplier.company_id() == company_id && supplier.name() == name)
            .cloned())
    }
}
