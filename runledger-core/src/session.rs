//! Tracker session: the single actor that owns clock, ledger and config.
//!
//! Each intent mutates in memory first and then persists the touched slots
//! best-effort, so a storage failure can never lose or block an event.
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clock::{ClockState, ElapsedParts, TimeSource};
use crate::config::RunConfig;
use crate::constants::{
    KEY_TRACKER_CONFIG, KEY_TRACKER_PROFIT_HISTORY, KEY_TRACKER_RUNS, KEY_TRACKER_TIMER,
    KEY_TRACKER_UNDO, RESET_STATISTICS_PROMPT,
};
use crate::input::{ConfigField, NumberField};
use crate::ledger::{ProfitPoint, RunLedger, RunOutcome, RunTally};
use crate::storage::{KeyValueStore, load_state, save_state};

/// Read-only view of everything the tracker displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerStats {
    pub elapsed_ms: u64,
    pub elapsed: ElapsedParts,
    pub running: bool,
    pub total: u32,
    pub drops: u32,
    pub no_drops: u32,
    pub drop_streak: u32,
    pub no_drop_streak: u32,
    pub drop_rate_percent: f64,
    pub runs_per_hour: f64,
    pub total_spent: f64,
    pub total_earned: f64,
    pub net_profit: f64,
    pub estimated_profit_per_hour: f64,
    pub profit_history: Vec<ProfitPoint>,
    pub can_undo: bool,
}

/// Destructive action waiting on the player's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Zero the ledger and the timer; the run config is kept.
    ResetStatistics,
}

/// A confirm/cancel prompt to show before running a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the action only runs once the prompt is resolved"]
pub struct ConfirmPrompt {
    pub message: &'static str,
    action: PendingAction,
}

impl ConfirmPrompt {
    pub const fn action(&self) -> PendingAction {
        self.action
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

pub struct TrackerSession<S, T>
where
    S: KeyValueStore,
    T: TimeSource,
{
    clock: ClockState,
    ledger: RunLedger,
    config: RunConfig,
    store: S,
    time: T,
}

impl<S, T> TrackerSession<S, T>
where
    S: KeyValueStore,
    T: TimeSource,
{
    /// Start a blank session that persists into `store`.
    pub fn new(store: S, time: T) -> Self {
        Self {
            clock: ClockState::new(),
            ledger: RunLedger::new(),
            config: RunConfig::default(),
            store,
            time,
        }
    }

    /// Reopen the session saved in `store`, falling back to defaults for
    /// any slot that is missing or unreadable.
    pub fn restore(store: S, time: T) -> Self {
        let clock = load_state(&store, KEY_TRACKER_TIMER, ClockState::new());
        let tally = load_state(&store, KEY_TRACKER_RUNS, RunTally::default());
        let history = load_state(
            &store,
            KEY_TRACKER_PROFIT_HISTORY,
            vec![ProfitPoint::ORIGIN],
        );
        let undo_stack = load_state(&store, KEY_TRACKER_UNDO, Vec::new());
        // Older saves keep the economics inside the runs object.
        let embedded = load_state(&store, KEY_TRACKER_RUNS, RunConfig::default());
        let mut config = load_state(&store, KEY_TRACKER_CONFIG, embedded);
        if let Err(err) = config.validate() {
            warn!("Ignoring stored run config: {err}");
            config = RunConfig::default();
        }
        debug!(
            "restored tracker session: {} runs, clock running: {}",
            tally.total(),
            clock.is_running()
        );
        Self {
            clock,
            ledger: RunLedger::restore(tally, history, undo_stack),
            config,
            store,
            time,
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &ClockState {
        &self.clock
    }

    #[must_use]
    pub const fn ledger(&self) -> &RunLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms(self.time.now_ms())
    }

    pub fn start_timer(&mut self) {
        self.clock.start(self.time.now_ms());
        self.persist_clock();
    }

    pub fn pause_timer(&mut self) {
        self.clock.pause(self.time.now_ms());
        self.persist_clock();
    }

    pub fn reset_timer(&mut self) {
        self.clock.reset();
        self.persist_clock();
    }

    pub fn record_drop(&mut self) {
        self.record(RunOutcome::Drop);
    }

    pub fn record_no_drop(&mut self) {
        self.record(RunOutcome::NoDrop);
    }

    pub fn record(&mut self, outcome: RunOutcome) {
        self.ledger.record(outcome, &self.config);
        debug!(
            "recorded {outcome:?}: run {} net {:.1}",
            self.ledger.tally().total(),
            self.ledger.tally().net_profit()
        );
        self.persist_ledger();
    }

    /// Roll back the last recorded run; a no-op when nothing is recorded.
    pub fn undo(&mut self) -> bool {
        let undone = self.ledger.undo();
        if undone {
            self.persist_ledger();
        }
        undone
    }

    /// Ask for confirmation before wiping statistics. Nothing changes until
    /// the returned prompt is resolved with [`Decision::Confirm`].
    pub const fn request_reset_statistics(&self) -> ConfirmPrompt {
        ConfirmPrompt {
            message: RESET_STATISTICS_PROMPT,
            action: PendingAction::ResetStatistics,
        }
    }

    /// Run or drop a pending action. Returns whether it ran.
    pub fn resolve(&mut self, prompt: ConfirmPrompt, decision: Decision) -> bool {
        if decision == Decision::Cancel {
            return false;
        }
        match prompt.action {
            PendingAction::ResetStatistics => {
                self.ledger.reset_statistics();
                self.clock.reset();
                debug!("statistics reset");
                self.persist_ledger();
                self.persist_clock();
            }
        }
        true
    }

    /// Apply raw text typed into a config field.
    pub fn edit_config(&mut self, field: ConfigField, raw: &str) {
        *self.config_field_mut(field) = NumberField::parse(raw);
        self.persist_config();
    }

    /// Settle a config field once focus leaves it.
    pub fn commit_config(&mut self, field: ConfigField) {
        let slot = self.config_field_mut(field);
        *slot = slot.commit();
        self.persist_config();
    }

    const fn config_field_mut(&mut self, field: ConfigField) -> &mut NumberField {
        match field {
            ConfigField::KeyCost => &mut self.config.key_cost,
            ConfigField::DropValue => &mut self.config.drop_value,
        }
    }

    /// Derived figures for the current instant.
    #[must_use]
    pub fn snapshot(&self) -> TrackerStats {
        let now = self.time.now_ms();
        let elapsed_ms = self.clock.elapsed_ms(now);
        let elapsed_secs = self.clock.elapsed_secs(now);
        let tally = self.ledger.tally();
        TrackerStats {
            elapsed_ms,
            elapsed: ElapsedParts::from_millis(elapsed_ms),
            running: self.clock.is_running(),
            total: tally.total(),
            drops: tally.drops(),
            no_drops: tally.no_drops(),
            drop_streak: tally.drop_streak(),
            no_drop_streak: tally.no_drop_streak(),
            drop_rate_percent: self.ledger.drop_rate_percent(),
            runs_per_hour: self.ledger.runs_per_hour(elapsed_secs),
            total_spent: tally.total_spent(),
            total_earned: tally.total_earned(),
            net_profit: tally.net_profit(),
            estimated_profit_per_hour: self.ledger.estimated_profit_per_hour(elapsed_secs),
            profit_history: self.ledger.profit_history().to_vec(),
            can_undo: self.ledger.can_undo(),
        }
    }

    fn persist_clock(&self) {
        save_state(&self.store, KEY_TRACKER_TIMER, &self.clock);
    }

    fn persist_ledger(&self) {
        save_state(&self.store, KEY_TRACKER_RUNS, self.ledger.tally());
        save_state(
            &self.store,
            KEY_TRACKER_PROFIT_HISTORY,
            self.ledger.profit_history(),
        );
        save_state(&self.store, KEY_TRACKER_UNDO, self.ledger.undo_stack());
    }

    fn persist_config(&self) {
        save_state(&self.store, KEY_TRACKER_CONFIG, &self.config);
    }
}
