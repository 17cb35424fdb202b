//! Parameters of the statutory tax derived from issued invoices.

use super::Competency;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How issued invoice value turns into a statutory obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRule {
    /// Fraction of gross invoice value owed.
    pub rate: Decimal,
    /// Day of the month following the competency when payment is due.
    pub due_day: u32,
    /// Name of the canonical fixed supplier.
    pub supplier_name: String,
    /// Name of the canonical expense classification.
    pub classification_name: String,
    /// Prefix of the obligation description, followed by `MM/YYYY`.
    pub description_prefix: String,
}

impl Default for TaxRule {
    fn default() -> Self {
        Self {
            rate: Decimal::new(6, 2),
            due_day: 25,
            supplier_name: "Federal Revenue Service".to_owned(),
            classification_name: "Taxes on revenue".to_owned(),
            description_prefix: "statutory tax, competency".to_owned(),
        }
    }
}

impl TaxRule {
    /// Returns the contribution owed on `gross_value`, rounded to cents.
    #[must_use]
    pub fn contribution(&self, gross_value: Decimal) -> Decimal {
        (gross_value * self.rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Returns the obligation description for a competency month.
    #[must_use]
    pub fn description(&self, competency: Competency) -> String {
        format!("{} {competency}", self.description_prefix.trim_end())
    }
}
