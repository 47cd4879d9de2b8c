//! Per-run economics entered on the tracker.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_DROP_VALUE, DEFAULT_KEY_COST, DEFAULT_MARKET_TAX_PERCENT};
use crate::input::NumberField;
use crate::numbers::percent;

/// Cost and reward settings applied to every recorded run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Paid once per run.
    pub key_cost: NumberField,
    /// Gross market value of one drop.
    pub drop_value: NumberField,
    #[serde(rename = "marketTax")]
    pub market_tax_percent: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            key_cost: NumberField::new(DEFAULT_KEY_COST),
            drop_value: NumberField::new(DEFAULT_DROP_VALUE),
            market_tax_percent: DEFAULT_MARKET_TAX_PERCENT,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub const fn key_cost(&self) -> f64 {
        self.key_cost.value()
    }

    #[must_use]
    pub const fn drop_value(&self) -> f64 {
        self.drop_value.value()
    }

    /// Income realized from one drop once the market takes its cut.
    #[must_use]
    pub fn net_drop_value(&self) -> f64 {
        self.drop_value() * (1.0 - percent(self.market_tax_percent))
    }

    /// Change the market tax, rejecting values outside `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RangeViolation` for out-of-range or non-finite input.
    pub fn set_market_tax(&mut self, tax_percent: f64) -> Result<(), ConfigError> {
        check_range("market_tax_percent", tax_percent, 0.0, 100.0)?;
        self.market_tax_percent = tax_percent;
        Ok(())
    }

    /// Confirm every field is within its documented bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RangeViolation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("key_cost", self.key_cost(), 0.0, f64::MAX)?;
        check_range("drop_value", self.drop_value(), 0.0, f64::MAX)?;
        check_range("market_tax_percent", self.market_tax_percent, 0.0, 100.0)
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        })
    }
}
