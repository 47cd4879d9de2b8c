//! Whole-app state: the active view plus every form, loaded from and saved
//! to one key/value store.
use serde::{Deserialize, Deserializer, Serialize};

use crate::calculator::{CalculatorForm, Projection};
use crate::clock::TimeSource;
use crate::comparator::{ComparisonReport, Slot, StrategyParams, compare};
use crate::constants::{
    COMPARISON_TAX_PERCENT, KEY_CALCULATOR, KEY_CURRENT_PAGE, KEY_STRATEGY_ONE, KEY_STRATEGY_TWO,
};
use crate::input::{CalculatorField, StrategyField};
use crate::session::TrackerSession;
use crate::storage::{KeyValueStore, load_state, save_state};

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    #[default]
    Tracker,
    Calculator,
    StratEfficiency,
}

impl Page {
    /// Parse a stored page name; anything unknown lands on the tracker.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "calculator" => Self::Calculator,
            "stratEfficiency" => Self::StratEfficiency,
            _ => Self::Tracker,
        }
    }
}

impl<'de> Deserialize<'de> for Page {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

pub struct AppState<S, T>
where
    S: KeyValueStore + Clone,
    T: TimeSource,
{
    page: Page,
    tracker: TrackerSession<S, T>,
    calculator: CalculatorForm,
    strategies: [StrategyParams; 2],
    store: S,
}

impl<S, T> AppState<S, T>
where
    S: KeyValueStore + Clone,
    T: TimeSource,
{
    /// Load every view's state from `store`.
    pub fn load(store: S, time: T) -> Self {
        Self {
            page: load_state(&store, KEY_CURRENT_PAGE, Page::Tracker),
            tracker: TrackerSession::restore(store.clone(), time),
            calculator: load_state(&store, KEY_CALCULATOR, CalculatorForm::default()),
            strategies: [
                load_state(&store, KEY_STRATEGY_ONE, StrategyParams::first_default()),
                load_state(&store, KEY_STRATEGY_TWO, StrategyParams::second_default()),
            ],
            store,
        }
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    pub fn navigate(&mut self, page: Page) {
        self.page = page;
        save_state(&self.store, KEY_CURRENT_PAGE, &self.page);
    }

    #[must_use]
    pub const fn tracker(&self) -> &TrackerSession<S, T> {
        &self.tracker
    }

    pub const fn tracker_mut(&mut self) -> &mut TrackerSession<S, T> {
        &mut self.tracker
    }

    #[must_use]
    pub const fn calculator(&self) -> &CalculatorForm {
        &self.calculator
    }

    #[must_use]
    pub fn projection(&self) -> Projection {
        self.calculator.projection()
    }

    pub fn edit_calculator(&mut self, field: CalculatorField, raw: &str) {
        self.calculator.edit(field, raw);
        save_state(&self.store, KEY_CALCULATOR, &self.calculator);
    }

    pub fn commit_calculator(&mut self, field: CalculatorField) {
        self.calculator.commit(field);
        save_state(&self.store, KEY_CALCULATOR, &self.calculator);
    }

    #[must_use]
    pub const fn strategy(&self, slot: Slot) -> &StrategyParams {
        &self.strategies[slot_index(slot)]
    }

    pub fn edit_strategy(&mut self, slot: Slot, field: StrategyField, raw: &str) {
        self.strategies[slot_index(slot)].edit(field, raw);
        self.persist_strategy(slot);
    }

    pub fn commit_strategy(&mut self, slot: Slot, field: StrategyField) {
        self.strategies[slot_index(slot)].commit(field);
        self.persist_strategy(slot);
    }

    /// Rank the two strategies under the fixed comparison tax.
    #[must_use]
    pub fn comparison(&self) -> ComparisonReport {
        compare(
            &self.strategies[0],
            &self.strategies[1],
            COMPARISON_TAX_PERCENT,
        )
    }

    fn persist_strategy(&self, slot: Slot) {
        let key = match slot {
            Slot::First => KEY_STRATEGY_ONE,
            Slot::Second => KEY_STRATEGY_TWO,
        };
        save_state(&self.store, key, self.strategy(slot));
    }
}

const fn slot_index(slot: Slot) -> usize {
    match slot {
        Slot::First => 0,
        Slot::Second => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTime;
    use crate::comparator::Verdict;
    use crate::input::NumberField;
    use crate::storage::MemoryStore;

    #[test]
    fn unknown_page_falls_back_to_tracker() {
        let store = MemoryStore::new();
        store.insert_raw(KEY_CURRENT_PAGE, "\"settings\"");
        let app = AppState::load(store, ManualTime::default());
        assert_eq!(app.page(), Page::Tracker);
    }

    #[test]
    fn navigation_persists() {
        let store = MemoryStore::new();
        let mut app = AppState::load(store.clone(), ManualTime::default());
        app.navigate(Page::StratEfficiency);
        assert_eq!(store.raw(KEY_CURRENT_PAGE).as_deref(), Some("\"stratEfficiency\""));
        let reopened = AppState::load(store, ManualTime::default());
        assert_eq!(reopened.page(), Page::StratEfficiency);
    }

    #[test]
    fn calculator_edits_survive_reload() {
        let store = MemoryStore::new();
        let mut app = AppState::load(store.clone(), ManualTime::default());
        app.edit_calculator(CalculatorField::NumberOfRuns, "160");
        assert!((app.projection().time_needed_hours - 2.0).abs() < 1e-9);
        let reopened = AppState::load(store, ManualTime::default());
        assert_eq!(reopened.calculator().number_of_runs, NumberField::Value(160.0));
    }

    #[test]
    fn strategy_edits_feed_the_comparison() {
        let store = MemoryStore::new();
        let mut app = AppState::load(store.clone(), ManualTime::default());
        assert!(matches!(
            app.comparison().verdict,
            Some(Verdict::Leader {
                leader: Slot::First,
                ..
            })
        ));
        app.edit_strategy(Slot::Second, StrategyField::DropValue, "");
        assert!(app.comparison().verdict.is_none());
        app.commit_strategy(Slot::Second, StrategyField::DropValue);
        assert_eq!(
            app.strategy(Slot::Second).drop_value,
            NumberField::Value(0.0)
        );
        let reopened = AppState::load(store, ManualTime::default());
        assert_eq!(reopened.strategy(Slot::Second).drop_value, NumberField::Value(0.0));
    }

    #[test]
    fn tracker_is_reachable_through_app() {
        let store = MemoryStore::new();
        let mut app = AppState::load(store.clone(), ManualTime::default());
        app.tracker_mut().record_drop();
        let reopened = AppState::load(store, ManualTime::default());
        assert_eq!(reopened.tracker().ledger().tally().drops(), 1);
    }
}
