//! Form input `name` attributes mapped onto core field identifiers.
use runledger_core::{CalculatorField, ConfigField, Page, Slot, StrategyField};

#[must_use]
pub fn config_field(name: &str) -> Option<ConfigField> {
    match name {
        "keyCost" => Some(ConfigField::KeyCost),
        "dropValue" => Some(ConfigField::DropValue),
        _ => None,
    }
}

#[must_use]
pub fn calculator_field(name: &str) -> Option<CalculatorField> {
    match name {
        "keyCost" => Some(CalculatorField::KeyCost),
        "dropValue" => Some(CalculatorField::DropValue),
        "dropRate" => Some(CalculatorField::DropRate),
        "runsPerHour" => Some(CalculatorField::RunsPerHour),
        "numberOfRuns" => Some(CalculatorField::NumberOfRuns),
        "marketTax" => Some(CalculatorField::MarketTax),
        _ => None,
    }
}

#[must_use]
pub fn strategy_field(name: &str) -> Option<StrategyField> {
    match name {
        "name" => Some(StrategyField::Name),
        "keyCost" => Some(StrategyField::KeyCost),
        "dropChance" => Some(StrategyField::DropChance),
        "dropValue" => Some(StrategyField::DropValue),
        "rph" => Some(StrategyField::RunsPerHour),
        _ => None,
    }
}

/// Strategy cards are numbered from 1 in the markup.
#[must_use]
pub const fn slot(index: u8) -> Option<Slot> {
    match index {
        1 => Some(Slot::First),
        2 => Some(Slot::Second),
        _ => None,
    }
}

#[must_use]
pub const fn page_name(page: Page) -> &'static str {
    match page {
        Page::Tracker => "tracker",
        Page::Calculator => "calculator",
        Page::StratEfficiency => "stratEfficiency",
    }
}
