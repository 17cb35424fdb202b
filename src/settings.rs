//! Layered runtime configuration.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `BILLWRIGHT__` using `__` between
//! nested keys (for example `BILLWRIGHT__TAX__RATE=0.05`).

use crate::payable::domain::TaxRule;
use crate::telemetry::LogSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BILLWRIGHT";

/// Accounts-payable maintenance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayableSettings {
    /// Days before the due date at which an obligation becomes due soon.
    pub due_soon_window_days: u64,
    /// Seconds between periodic sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for PayableSettings {
    fn default() -> Self {
        Self {
            due_soon_window_days: 5,
            sweep_interval_secs: 3600,
        }
    }
}

impl PayableSettings {
    /// Returns the sweep interval.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Statutory tax derivation.
    pub tax: TaxRule,
    /// Obligation maintenance.
    pub payables: PayableSettings,
    /// Logging.
    pub log: LogSettings,
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized.
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    /// A value is outside its accepted range.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Dotted setting key.
        key: &'static str,
        /// Why the value was refused.
        reason: String,
    },
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a source fails to parse or
    /// [`SettingsError::Invalid`] when a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(file) = path {
            builder = builder.add_source(config::File::from(file));
        }
        let settings: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] for a tax rate outside `(0, 1]`,
    /// a due day outside `1..=31`, a blank catalog name or a zero sweep
    /// interval.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tax.rate <= Decimal::ZERO || self.tax.rate > Decimal::ONE {
            return Err(SettingsError::Invalid {
                key: "tax.rate",
                reason: format!("{} is outside (0, 1]", self.tax.rate),
            });
        }
        if !(1..=31).contains(&self.tax.due_day) {
            return Err(SettingsError::Invalid {
                key: "tax.due_day",
                reason: format!("{} is outside 1..=31", self.tax.due_day),
            });
        }
        if self.tax.supplier_name.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "tax.supplier_name",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.tax.classification_name.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "tax.classification_name",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.payables.sweep_interval_secs == 0 {
            return Err(SettingsError::Invalid {
                key: "payables.sweep_interval_secs",
                reason: "must be positive".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsError};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    struct TempToml(PathBuf);

    impl TempToml {
        fn new(contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!("billwright-{}.toml", uuid::Uuid::new_v4()));
            std::fs::write(&path, contents).expect("write temp settings");
            Self(path)
        }
    }

    impl Drop for TempToml {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).unwrap_or_default();
        }
    }

    #[rstest]
    fn defaults_match_statutory_rule() {
        let settings = Settings::default();
        assert_eq!(settings.tax.rate, Decimal::new(6, 2));
        assert_eq!(settings.tax.due_day, 25);
        assert_eq!(settings.payables.due_soon_window_days, 5);
        assert!(settings.validate().is_ok());
    }

    #[rstest]
    fn file_values_override_defaults() {
        let file = TempToml::new(
            r#"
            [tax]
            rate = 0.05
            due_day = 20

            [payables]
            due_soon_window_days = 3

            [log]
            level = "debug"
            format = "json"
            "#,
        );
        let settings = Settings::load(Some(&file.0)).expect("settings load");
        assert_eq!(settings.tax.rate, Decimal::new(5, 2));
        assert_eq!(settings.tax.due_day, 20);
        assert_eq!(settings.tax.supplier_name, Settings::default().tax.supplier_name);
        assert_eq!(settings.payables.due_soon_window_days, 3);
        assert_eq!(settings.payables.sweep_interval_secs, 3600);
    }

    #[rstest]
    fn out_of_range_due_day_is_rejected() {
        let file = TempToml::new("[tax]\ndue_day = 40\n");
        let result = Settings::load(Some(&file.0));
        assert!(matches!(
            result,
            Err(SettingsError::Invalid { key: "tax.due_day", .. })
        ));
    }
}
