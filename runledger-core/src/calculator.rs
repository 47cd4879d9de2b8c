//! Expected-value projection for a planned batch of runs.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CALC_DEFAULT_DROP_RATE_PERCENT, CALC_DEFAULT_NUMBER_OF_RUNS, CALC_DEFAULT_RUNS_PER_HOUR,
    DEFAULT_DROP_VALUE, DEFAULT_KEY_COST, DEFAULT_MARKET_TAX_PERCENT,
};
use crate::input::{CalculatorField, NumberField};
use crate::numbers::{guarded_ratio, percent};

/// Sanitized calculator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectionInputs {
    pub key_cost: f64,
    pub drop_value: f64,
    pub drop_rate_percent: f64,
    pub runs_per_hour: f64,
    pub number_of_runs: f64,
    pub market_tax_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Projection {
    pub expected_drops: f64,
    pub gross_profit: f64,
    pub tax_amount: f64,
    pub total_cost: f64,
    pub net_profit: f64,
    pub time_needed_hours: f64,
    pub profit_per_hour: f64,
}

#[must_use]
pub fn project(inputs: &ProjectionInputs) -> Projection {
    let expected_drops = inputs.number_of_runs * percent(inputs.drop_rate_percent);
    let gross_profit = expected_drops * inputs.drop_value;
    let tax_amount = gross_profit * percent(inputs.market_tax_percent);
    let total_cost = inputs.key_cost * inputs.number_of_runs;
    let net_profit = gross_profit - tax_amount - total_cost;
    let time_needed_hours = guarded_ratio(inputs.number_of_runs, inputs.runs_per_hour);
    let profit_per_hour = if inputs.runs_per_hour > 0.0 && inputs.number_of_runs > 0.0 {
        guarded_ratio(net_profit, time_needed_hours)
    } else {
        0.0
    };
    Projection {
        expected_drops,
        gross_profit,
        tax_amount,
        total_cost,
        net_profit,
        time_needed_hours,
        profit_per_hour,
    }
}

/// Editable calculator form as persisted between visits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorForm {
    pub key_cost: NumberField,
    pub drop_value: NumberField,
    #[serde(rename = "dropRate")]
    pub drop_rate_percent: NumberField,
    pub runs_per_hour: NumberField,
    pub number_of_runs: NumberField,
    #[serde(rename = "marketTax")]
    pub market_tax_percent: NumberField,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self {
            key_cost: NumberField::new(DEFAULT_KEY_COST),
            drop_value: NumberField::new(DEFAULT_DROP_VALUE),
            drop_rate_percent: NumberField::new(CALC_DEFAULT_DROP_RATE_PERCENT),
            runs_per_hour: NumberField::new(CALC_DEFAULT_RUNS_PER_HOUR),
            number_of_runs: NumberField::new(CALC_DEFAULT_NUMBER_OF_RUNS),
            market_tax_percent: NumberField::new(DEFAULT_MARKET_TAX_PERCENT),
        }
    }
}

impl CalculatorForm {
    #[must_use]
    pub const fn inputs(&self) -> ProjectionInputs {
        ProjectionInputs {
            key_cost: self.key_cost.value(),
            drop_value: self.drop_value.value(),
            drop_rate_percent: self.drop_rate_percent.value(),
            runs_per_hour: self.runs_per_hour.value(),
            number_of_runs: self.number_of_runs.value(),
            market_tax_percent: self.market_tax_percent.value(),
        }
    }

    #[must_use]
    pub fn projection(&self) -> Projection {
        project(&self.inputs())
    }

    /// Apply raw text typed into a field.
    pub fn edit(&mut self, field: CalculatorField, raw: &str) {
        *self.field_mut(field) = NumberField::parse(raw);
    }

    /// Settle a field once focus leaves it.
    pub fn commit(&mut self, field: CalculatorField) {
        let slot = self.field_mut(field);
        *slot = slot.commit();
    }

    const fn field_mut(&mut self, field: CalculatorField) -> &mut NumberField {
        match field {
            CalculatorField::KeyCost => &mut self.key_cost,
            CalculatorField::DropValue => &mut self.drop_value,
            CalculatorField::DropRate => &mut self.drop_rate_percent,
            CalculatorField::RunsPerHour => &mut self.runs_per_hour,
            CalculatorField::NumberOfRuns => &mut self.number_of_runs,
            CalculatorField::MarketTax => &mut self.market_tax_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_form_projects_reference_numbers() {
        let result = CalculatorForm::default().projection();
        assert!(close(result.expected_drops, 40.0));
        assert!(close(result.gross_profit, 2080.0));
        assert!(close(result.tax_amount, 260.0));
        assert!(close(result.total_cost, 1120.0));
        assert!(close(result.net_profit, 700.0));
        assert!(close(result.time_needed_hours, 1.0));
        assert!(close(result.profit_per_hour, 700.0));
    }

    #[test]
    fn zero_throughput_yields_zero_time_and_rate() {
        let mut form = CalculatorForm::default();
        form.edit(CalculatorField::RunsPerHour, "0");
        let result = form.projection();
        assert!(close(result.time_needed_hours, 0.0));
        assert!(close(result.profit_per_hour, 0.0));
        assert!(close(result.net_profit, 700.0));
    }

    #[test]
    fn zero_runs_yields_zero_rate() {
        let mut form = CalculatorForm::default();
        form.edit(CalculatorField::NumberOfRuns, "");
        let result = form.projection();
        assert!(close(result.profit_per_hour, 0.0));
        assert!(close(result.total_cost, 0.0));
        assert!(form.number_of_runs.is_blank());
        form.commit(CalculatorField::NumberOfRuns);
        assert_eq!(form.number_of_runs, NumberField::Value(0.0));
    }

    #[test]
    fn garbage_input_never_produces_nan() {
        let mut form = CalculatorForm::default();
        for field in [
            CalculatorField::KeyCost,
            CalculatorField::DropValue,
            CalculatorField::DropRate,
            CalculatorField::RunsPerHour,
            CalculatorField::NumberOfRuns,
            CalculatorField::MarketTax,
        ] {
            form.edit(field, "not a number");
        }
        let result = form.projection();
        for value in [
            result.expected_drops,
            result.gross_profit,
            result.tax_amount,
            result.total_cost,
            result.net_profit,
            result.time_needed_hours,
            result.profit_per_hour,
        ] {
            assert!(value.is_finite());
            assert!(close(value, 0.0));
        }
    }

    #[test]
    fn profit_per_hour_scales_with_time_needed() {
        let inputs = ProjectionInputs {
            key_cost: 10.0,
            drop_value: 100.0,
            drop_rate_percent: 25.0,
            runs_per_hour: 40.0,
            number_of_runs: 120.0,
            market_tax_percent: 0.0,
        };
        let result = project(&inputs);
        // 30 drops * 100 - 1200 = 1800 over 3 hours.
        assert!(close(result.net_profit, 1800.0));
        assert!(close(result.time_needed_hours, 3.0));
        assert!(close(result.profit_per_hour, 600.0));
    }

    #[test]
    fn form_reads_stored_field_names() {
        let raw = r#"{"keyCost":"14","dropValue":52,"dropRate":50,"runsPerHour":80,
            "numberOfRuns":"","marketTax":12.5}"#;
        let form: CalculatorForm = serde_json::from_str(raw).unwrap();
        assert_eq!(form.key_cost, NumberField::Value(14.0));
        assert_eq!(form.drop_rate_percent, NumberField::Value(50.0));
        assert!(form.number_of_runs.is_blank());
    }
}
