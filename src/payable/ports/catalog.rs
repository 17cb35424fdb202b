//! Port for company-scoped suppliers and expense classifications.

use crate::directory::domain::CompanyId;
use crate::payable::domain::{ExpenseClassification, Supplier};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for expense catalog operations.
pub type ExpenseCatalogResult<T> = Result<T, ExpenseCatalogError>;

/// Catalog lookup contract.
///
/// Names match exactly within a company. The `find_or_create` operations
/// are atomic, so concurrent callers resolve to the same record.
#[async_trait]
pub trait ExpenseCatalog: Send + Sync {
    /// Returns the supplier named like `candidate`, storing `candidate` when
    /// none exists.
    async fn find_or_create_supplier(&self, candidate: Supplier) -> ExpenseCatalogResult<Supplier>;

    /// Returns the classification named like `candidate`, storing
    /// `candidate` when none exists.
    async fn find_or_create_classification(
        &self,
        candidate: ExpenseClassification,
    ) -> ExpenseCatalogResult<ExpenseClassification>;

    /// Finds a supplier by exact name.
    async fn find_supplier_by_name(
        &self,
        company_id: CompanyId,
        name: &str,
    ) -> ExpenseCatalogResult<Option<Supplier>>;
}

/// Errors returned by expense catalog implementations.
#[derive(Debug, Clone, Error)]
pub enum ExpenseCatalogError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExpenseCatalogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
