//! Side-by-side efficiency comparison of two farming strategies.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    STRATEGY_ONE_DROP_CHANCE, STRATEGY_ONE_DROP_VALUE, STRATEGY_ONE_KEY_COST, STRATEGY_ONE_LABEL,
    STRATEGY_ONE_RPH, STRATEGY_TWO_DROP_CHANCE, STRATEGY_TWO_DROP_VALUE, STRATEGY_TWO_KEY_COST,
    STRATEGY_TWO_LABEL, STRATEGY_TWO_RPH,
};
use crate::input::{NumberField, StrategyField};
use crate::numbers::percent;

/// One strategy as entered on its card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyParams {
    #[serde(default)]
    pub name: String,
    /// Total key cost paid per run.
    #[serde(default)]
    pub key_cost: NumberField,
    #[serde(default, rename = "dropChance")]
    pub drop_chance_percent: NumberField,
    #[serde(default)]
    pub drop_value: NumberField,
    #[serde(default, rename = "rph")]
    pub runs_per_hour: NumberField,
}

impl StrategyParams {
    /// Preset shown in the first comparison slot.
    #[must_use]
    pub fn first_default() -> Self {
        Self {
            name: STRATEGY_ONE_LABEL.to_string(),
            key_cost: NumberField::new(STRATEGY_ONE_KEY_COST),
            drop_chance_percent: NumberField::new(STRATEGY_ONE_DROP_CHANCE),
            drop_value: NumberField::new(STRATEGY_ONE_DROP_VALUE),
            runs_per_hour: NumberField::new(STRATEGY_ONE_RPH),
        }
    }

    /// Preset shown in the second comparison slot.
    #[must_use]
    pub fn second_default() -> Self {
        Self {
            name: STRATEGY_TWO_LABEL.to_string(),
            key_cost: NumberField::new(STRATEGY_TWO_KEY_COST),
            drop_chance_percent: NumberField::new(STRATEGY_TWO_DROP_CHANCE),
            drop_value: NumberField::new(STRATEGY_TWO_DROP_VALUE),
            runs_per_hour: NumberField::new(STRATEGY_TWO_RPH),
        }
    }

    /// Every numeric field has been filled in.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        !(self.key_cost.is_blank()
            || self.drop_chance_percent.is_blank()
            || self.drop_value.is_blank()
            || self.runs_per_hour.is_blank())
    }

    /// Apply raw text typed into a field. Names are stored verbatim.
    pub fn edit(&mut self, field: StrategyField, raw: &str) {
        match self.number_mut(field) {
            Some(slot) => *slot = NumberField::parse(raw),
            None => self.name = raw.to_string(),
        }
    }

    /// Settle a numeric field once focus leaves it.
    pub fn commit(&mut self, field: StrategyField) {
        if let Some(slot) = self.number_mut(field) {
            *slot = slot.commit();
        }
    }

    const fn number_mut(&mut self, field: StrategyField) -> Option<&mut NumberField> {
        match field {
            StrategyField::Name => None,
            StrategyField::KeyCost => Some(&mut self.key_cost),
            StrategyField::DropChance => Some(&mut self.drop_chance_percent),
            StrategyField::DropValue => Some(&mut self.drop_value),
            StrategyField::RunsPerHour => Some(&mut self.runs_per_hour),
        }
    }

    /// Name to print, falling back to the slot label when empty.
    #[must_use]
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.name.is_empty() {
            fallback
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategyMetrics {
    pub investment_per_run: f64,
    pub total_hourly_investment: f64,
    pub gross_revenue_per_run: f64,
    pub net_revenue_per_run: f64,
    pub net_profit_per_run: f64,
    pub profit_per_hour: f64,
    pub is_valid: bool,
}

impl StrategyMetrics {
    /// Derive per-run and hourly figures. Incomplete strategies report all
    /// zeros and `is_valid == false`.
    #[must_use]
    pub fn evaluate(params: &StrategyParams, tax_percent: f64) -> Self {
        if !params.is_complete() {
            return Self::default();
        }
        let key_cost = params.key_cost.value();
        let runs_per_hour = params.runs_per_hour.value();
        let investment_per_run = key_cost;
        let total_hourly_investment = if runs_per_hour > 0.0 {
            investment_per_run * runs_per_hour
        } else {
            0.0
        };
        let gross_revenue_per_run =
            params.drop_value.value() * percent(params.drop_chance_percent.value());
        let net_revenue_per_run = gross_revenue_per_run * (1.0 - percent(tax_percent));
        let net_profit_per_run = net_revenue_per_run - investment_per_run;
        let profit_per_hour = if runs_per_hour > 0.0 {
            net_profit_per_run * runs_per_hour
        } else {
            0.0
        };
        Self {
            investment_per_run,
            total_hourly_investment,
            gross_revenue_per_run,
            net_revenue_per_run,
            net_profit_per_run,
            profit_per_hour,
            is_valid: true,
        }
    }
}

/// Which comparison slot a verdict refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::First => STRATEGY_ONE_LABEL,
            Self::Second => STRATEGY_TWO_LABEL,
        }
    }
}

/// What it would take for the lagging strategy to catch up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    /// Runs per hour the laggard needs to match the leader's hourly profit.
    Target(f64),
    /// The laggard loses money per run; more runs only widen the gap.
    Unreachable,
    /// Neither strategy earns a positive hourly profit.
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Leader {
        leader: Slot,
        margin_per_hour: f64,
        break_even: BreakEven,
    },
    Parity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub first_name: String,
    pub second_name: String,
    pub first: StrategyMetrics,
    pub second: StrategyMetrics,
    /// Present only when both strategies are valid.
    pub verdict: Option<Verdict>,
}

impl ComparisonReport {
    #[must_use]
    pub const fn metrics(&self, slot: Slot) -> &StrategyMetrics {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    #[must_use]
    pub fn name(&self, slot: Slot) -> &str {
        match slot {
            Slot::First => &self.first_name,
            Slot::Second => &self.second_name,
        }
    }

    /// Headline sentence for the verdict, if any.
    #[must_use]
    pub fn summary_line(&self) -> Option<String> {
        match self.verdict? {
            Verdict::Parity => {
                Some("Both strategies are currently equally profitable per hour.".to_string())
            }
            Verdict::Leader {
                leader,
                margin_per_hour,
                ..
            } => Some(format!(
                "{} is {margin_per_hour:.1} FE/hr more profitable.",
                self.name(leader)
            )),
        }
    }

    /// Follow-up sentence describing the break-even throughput, if any.
    #[must_use]
    pub fn break_even_line(&self) -> Option<String> {
        let Some(Verdict::Leader {
            leader, break_even, ..
        }) = self.verdict
        else {
            return None;
        };
        let lagging = self.name(leader.other());
        match break_even {
            BreakEven::Target(rph) => {
                Some(format!("{lagging} would need approx. {rph:.1} RPH to match."))
            }
            BreakEven::Unreachable => Some(format!(
                "{lagging} is currently not profitable per run, cannot match by increasing RPH."
            )),
            BreakEven::NotApplicable => None,
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.summary_line() {
            write!(f, "{line}")?;
        }
        if let Some(line) = self.break_even_line() {
            write!(f, " {line}")?;
        }
        Ok(())
    }
}

/// Evaluate both strategies under one tax rate and rank them.
#[must_use]
pub fn compare(
    first: &StrategyParams,
    second: &StrategyParams,
    tax_percent: f64,
) -> ComparisonReport {
    let first_metrics = StrategyMetrics::evaluate(first, tax_percent);
    let second_metrics = StrategyMetrics::evaluate(second, tax_percent);
    let verdict = (first_metrics.is_valid && second_metrics.is_valid)
        .then(|| rank(&first_metrics, &second_metrics));
    ComparisonReport {
        first_name: first.display_name(Slot::First.default_label()).to_string(),
        second_name: second.display_name(Slot::Second.default_label()).to_string(),
        first: first_metrics,
        second: second_metrics,
        verdict,
    }
}

#[allow(clippy::float_cmp)]
fn rank(first: &StrategyMetrics, second: &StrategyMetrics) -> Verdict {
    if first.profit_per_hour == second.profit_per_hour {
        return Verdict::Parity;
    }
    let (leader, lead, lagging) = if first.profit_per_hour > second.profit_per_hour {
        (Slot::First, first, second)
    } else {
        (Slot::Second, second, first)
    };
    let break_even = if lagging.net_profit_per_run > 0.0 {
        let target = lead.profit_per_hour / lagging.net_profit_per_run;
        if target.is_finite() && target > 0.0 {
            BreakEven::Target(target)
        } else {
            BreakEven::NotApplicable
        }
    } else if lead.profit_per_hour > 0.0 {
        BreakEven::Unreachable
    } else {
        BreakEven::NotApplicable
    };
    Verdict::Leader {
        leader,
        margin_per_hour: (first.profit_per_hour - second.profit_per_hour).abs(),
        break_even,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COMPARISON_TAX_PERCENT;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn preset_strategies_match_reference_figures() {
        let report = compare(
            &StrategyParams::first_default(),
            &StrategyParams::second_default(),
            COMPARISON_TAX_PERCENT,
        );
        assert!(close(report.first.net_profit_per_run, 7.5));
        assert!(close(report.first.profit_per_hour, 607.5));
        assert!(close(report.first.total_hourly_investment, 1093.5));
        assert!(close(report.second.net_profit_per_run, 10.5));
        assert!(close(report.second.profit_per_hour, 420.0));

        let Some(Verdict::Leader {
            leader,
            margin_per_hour,
            break_even: BreakEven::Target(rph),
        }) = report.verdict
        else {
            panic!("expected a leader with a break-even target, got {:?}", report.verdict);
        };
        assert_eq!(leader, Slot::First);
        assert!(close(margin_per_hour, 187.5));
        assert!((rph - 57.857_142_857).abs() < 1e-6);
        assert_eq!(
            report.to_string(),
            "3 Key Keegan is 187.5 FE/hr more profitable. \
             4 Key Keegan Uber would need approx. 57.9 RPH to match."
        );
    }

    #[test]
    fn blank_field_invalidates_strategy() {
        let mut second = StrategyParams::second_default();
        second.edit(StrategyField::RunsPerHour, "");
        let report = compare(&StrategyParams::first_default(), &second, COMPARISON_TAX_PERCENT);
        assert!(report.first.is_valid);
        assert!(!report.second.is_valid);
        assert_eq!(report.second, StrategyMetrics::default());
        assert!(report.verdict.is_none());
        assert!(report.to_string().is_empty());

        second.commit(StrategyField::RunsPerHour);
        assert!(StrategyMetrics::evaluate(&second, COMPARISON_TAX_PERCENT).is_valid);
    }

    #[test]
    fn losing_laggard_cannot_catch_up() {
        let mut second = StrategyParams::second_default();
        second.edit(StrategyField::KeyCost, "60");
        let report = compare(&StrategyParams::first_default(), &second, COMPARISON_TAX_PERCENT);
        assert!(matches!(
            report.verdict,
            Some(Verdict::Leader {
                leader: Slot::First,
                break_even: BreakEven::Unreachable,
                ..
            })
        ));
        assert_eq!(
            report.break_even_line().as_deref(),
            Some("4 Key Keegan Uber is currently not profitable per run, cannot match by increasing RPH.")
        );
    }

    #[test]
    fn second_slot_can_lead() {
        let mut first = StrategyParams::first_default();
        first.edit(StrategyField::RunsPerHour, "20");
        let report = compare(
            &first,
            &StrategyParams::second_default(),
            COMPARISON_TAX_PERCENT,
        );
        let Some(Verdict::Leader {
            leader,
            margin_per_hour,
            break_even: BreakEven::Target(rph),
        }) = report.verdict
        else {
            panic!("expected second slot to lead");
        };
        assert_eq!(leader, Slot::Second);
        assert!(close(margin_per_hour, 420.0 - 150.0));
        assert!(close(rph, 56.0));
    }

    #[test]
    fn both_losing_has_no_break_even() {
        let mut first = StrategyParams::first_default();
        first.edit(StrategyField::KeyCost, "100");
        let mut second = StrategyParams::second_default();
        second.edit(StrategyField::KeyCost, "100");
        let report = compare(&first, &second, COMPARISON_TAX_PERCENT);
        assert!(matches!(
            report.verdict,
            Some(Verdict::Leader {
                break_even: BreakEven::NotApplicable,
                ..
            })
        ));
        assert!(report.break_even_line().is_none());
    }

    #[test]
    fn identical_strategies_report_parity() {
        let report = compare(
            &StrategyParams::first_default(),
            &StrategyParams::first_default(),
            COMPARISON_TAX_PERCENT,
        );
        assert_eq!(report.verdict, Some(Verdict::Parity));
        assert_eq!(
            report.to_string(),
            "Both strategies are currently equally profitable per hour."
        );
    }

    #[test]
    fn blank_names_fall_back_to_slot_labels() {
        let mut first = StrategyParams::first_default();
        first.edit(StrategyField::Name, "");
        let mut second = StrategyParams::second_default();
        second.edit(StrategyField::Name, "Solo Uber");
        let report = compare(&first, &second, COMPARISON_TAX_PERCENT);
        assert_eq!(report.name(Slot::First), "3 Key Keegan");
        assert_eq!(report.name(Slot::Second), "Solo Uber");
    }

    #[test]
    fn whitespace_names_are_shown_as_typed() {
        let mut first = StrategyParams::first_default();
        first.edit(StrategyField::Name, "  ");
        let report = compare(
            &first,
            &StrategyParams::second_default(),
            COMPARISON_TAX_PERCENT,
        );
        assert_eq!(report.name(Slot::First), "  ");
    }

    #[test]
    fn stored_strings_and_blanks_load() {
        let raw = r#"{"name":"","keyCost":"","dropChance":"50","dropValue":48,"rph":81}"#;
        let params: StrategyParams = serde_json::from_str(raw).unwrap();
        assert!(params.key_cost.is_blank());
        assert_eq!(params.drop_chance_percent, NumberField::Value(50.0));
        assert!(!params.is_complete());
    }
}
