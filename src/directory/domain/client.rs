//! Client record as seen by the billing core.

use super::{ClientId, CompanyId, DirectoryDomainError};
use serde::{Deserialize, Serialize};

/// A company-scoped client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    company_id: CompanyId,
    display_name: String,
}

impl Client {
    /// Creates a client with a validated display name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyDisplayName`] when the name is
    /// blank.
    pub fn new(
        company_id: CompanyId,
        display_name: impl Into<String>,
    ) -> Result<Self, DirectoryDomainError> {
        let raw = display_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyDisplayName);
        }
        Ok(Self {
            id: ClientId::new(),
            company_id,
            display_name: trimmed.to_owned(),
        })
    }

    /// Returns the client identifier.
    #[must_use]
    pub const fn id(&self) -> ClientId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the display name as registered.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_display_name_is_rejected(#[case] name: &str) {
        let result = Client::new(CompanyId::new(), name);
        assert_eq!(result, Err(DirectoryDomainError::EmptyDisplayName));
    }

    #[rstest]
    fn display_name_is_trimmed() {
        let client = Client::new(CompanyId::new(), "  Acme Ltda ").expect("valid client");
        assert_eq!(client.display_name(), "Acme Ltda");
    }
}
