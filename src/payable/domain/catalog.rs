//! Company-scoped catalog entities resolved by exact name.

use super::{ExpenseClassificationId, PayableDomainError, SupplierId};
use crate::directory::domain::CompanyId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A creditor an obligation is owed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    company_id: CompanyId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Supplier {
    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::EmptyName`] when the name is blank.
    pub fn new(
        company_id: CompanyId,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, PayableDomainError> {
        Ok(Self {
            id: SupplierId::new(),
            company_id,
            name: required_name(name.into(), "supplier")?,
            created_at: clock.utc(),
        })
    }

    /// Returns the supplier identifier.
    #[must_use]
    pub const fn id(&self) -> SupplierId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A chart-of-accounts entry classifying an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseClassification {
    id: ExpenseClassificationId,
    company_id: CompanyId,
    name: String,
    created_at: DateTime<Utc>,
}

impl ExpenseClassification {
    /// Creates a classification.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::EmptyName`] when the name is blank.
    pub fn new(
        company_id: CompanyId,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, PayableDomainError> {
        Ok(Self {
            id: ExpenseClassificationId::new(),
            company_id,
            name: required_name(name.into(), "classification")?,
            created_at: clock.utc(),
        })
    }

    /// Returns the classification identifier.
    #[must_use]
    pub const fn id(&self) -> ExpenseClassificationId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn required_name(name: String, what: &'static str) -> Result<String, PayableDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PayableDomainError::EmptyName(what));
    }
    Ok(trimmed.to_owned())
}
