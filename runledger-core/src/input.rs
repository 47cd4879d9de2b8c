//! User-entered numeric fields.
//!
//! A field may be cleared while the player is typing; formulas never see
//! that state directly and read it as 0 instead.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::numbers::finite_or_zero;

/// A numeric form field that may be blank mid-edit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NumberField {
    /// The field was cleared and has not been committed yet.
    #[default]
    Blank,
    /// A finite number.
    Value(f64),
}

impl NumberField {
    /// Wrap a number, coercing non-finite input to 0.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self::Value(finite_or_zero(value))
    }

    /// Interpret raw text the way the edit boxes do: empty text stays blank,
    /// anything that is not a finite number becomes 0.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::new(value),
            Err(_) => Self::Value(0.0),
        }
    }

    /// Value used by every formula; blank reads as 0.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Blank => 0.0,
            Self::Value(value) => value,
        }
    }

    #[must_use]
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Settle the field once editing ends: a blank field becomes 0.
    #[must_use]
    pub const fn commit(self) -> Self {
        match self {
            Self::Blank => Self::Value(0.0),
            value @ Self::Value(_) => value,
        }
    }
}

impl From<f64> for NumberField {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for NumberField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Blank => serializer.serialize_str(""),
            Self::Value(value) => serializer.serialize_f64(*value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Number(f64),
    Text(String),
    Null(()),
}

impl<'de> Deserialize<'de> for NumberField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawField::deserialize(deserializer)? {
            RawField::Number(value) => Self::new(value),
            RawField::Text(text) => Self::parse(&text),
            RawField::Null(()) => Self::Blank,
        })
    }
}

/// Identifies one editable numeric field of the tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    KeyCost,
    DropValue,
}

/// Identifies one editable numeric field of the profit calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorField {
    KeyCost,
    DropValue,
    DropRate,
    RunsPerHour,
    NumberOfRuns,
    MarketTax,
}

/// Identifies one editable field of a strategy card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyField {
    Name,
    KeyCost,
    DropChance,
    DropValue,
    RunsPerHour,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_blank_and_zeroes_garbage() {
        assert_eq!(NumberField::parse(""), NumberField::Blank);
        assert_eq!(NumberField::parse("   "), NumberField::Blank);
        assert_eq!(NumberField::parse("abc"), NumberField::Value(0.0));
        assert_eq!(NumberField::parse("NaN"), NumberField::Value(0.0));
        assert_eq!(NumberField::parse("inf"), NumberField::Value(0.0));
        assert_eq!(NumberField::parse(" 13.5 "), NumberField::Value(13.5));
    }

    #[test]
    fn blank_reads_as_zero_and_commits_to_zero() {
        let field = NumberField::Blank;
        assert!(field.value().abs() < f64::EPSILON);
        assert_eq!(field.commit(), NumberField::Value(0.0));
        assert_eq!(NumberField::Value(4.0).commit(), NumberField::Value(4.0));
    }

    #[test]
    fn serde_matches_stored_shapes() {
        assert_eq!(serde_json::to_string(&NumberField::Blank).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&NumberField::Value(52.0)).unwrap(), "52.0");

        let from_text: NumberField = serde_json::from_str("\"14\"").unwrap();
        assert_eq!(from_text, NumberField::Value(14.0));
        let from_empty: NumberField = serde_json::from_str("\"\"").unwrap();
        assert_eq!(from_empty, NumberField::Blank);
        let from_int: NumberField = serde_json::from_str("80").unwrap();
        assert_eq!(from_int, NumberField::Value(80.0));
        let from_null: NumberField = serde_json::from_str("null").unwrap();
        assert_eq!(from_null, NumberField::Blank);
    }
}
