//! Run outcome ledger with full-snapshot undo.
//!
//! Every mutating event pushes a complete copy of the tally and profit
//! history before touching them, so undo is an exact restore rather than a
//! field-by-field decrement.
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::constants::SECONDS_PER_HOUR;
use crate::numbers::{guarded_ratio, u64_to_f64};

/// Aggregate counters for the runs recorded this session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunTally {
    total: u32,
    drops: u32,
    no_drops: u32,
    drop_streak: u32,
    no_drop_streak: u32,
    total_spent: f64,
    total_earned: f64,
    net_profit: f64,
}

impl RunTally {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub const fn drops(&self) -> u32 {
        self.drops
    }

    #[must_use]
    pub const fn no_drops(&self) -> u32 {
        self.no_drops
    }

    #[must_use]
    pub const fn drop_streak(&self) -> u32 {
        self.drop_streak
    }

    #[must_use]
    pub const fn no_drop_streak(&self) -> u32 {
        self.no_drop_streak
    }

    #[must_use]
    pub const fn total_spent(&self) -> f64 {
        self.total_spent
    }

    #[must_use]
    pub const fn total_earned(&self) -> f64 {
        self.total_earned
    }

    #[must_use]
    pub const fn net_profit(&self) -> f64 {
        self.net_profit
    }

    /// Re-derive the dependent fields so a tally read from storage satisfies
    /// the ledger invariants.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.total = self.drops.saturating_add(self.no_drops);
        if self.drop_streak > 0 && self.no_drop_streak > 0 {
            self.drop_streak = 0;
            self.no_drop_streak = 0;
        }
        self.recompute_net();
        self
    }

    fn recompute_net(&mut self) {
        self.net_profit = self.total_earned - self.total_spent;
    }

    fn apply(&mut self, outcome: RunOutcome, config: &RunConfig) {
        self.total = self.total.saturating_add(1);
        match outcome {
            RunOutcome::Drop => {
                self.drops = self.drops.saturating_add(1);
                self.drop_streak = self.drop_streak.saturating_add(1);
                self.no_drop_streak = 0;
                self.total_earned += config.net_drop_value();
            }
            RunOutcome::NoDrop => {
                self.no_drops = self.no_drops.saturating_add(1);
                self.no_drop_streak = self.no_drop_streak.saturating_add(1);
                self.drop_streak = 0;
            }
        }
        self.total_spent += config.key_cost();
        self.recompute_net();
    }
}

/// Result of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Drop,
    NoDrop,
}

/// Cumulative net profit after a given run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfitPoint {
    pub run: u32,
    pub profit: f64,
}

impl ProfitPoint {
    pub const ORIGIN: Self = Self {
        run: 0,
        profit: 0.0,
    };
}

/// Full copy of the ledger taken before a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    #[serde(rename = "runs")]
    pub tally: RunTally,
    pub profit_history: Vec<ProfitPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLedger {
    tally: RunTally,
    profit_history: Vec<ProfitPoint>,
    undo_stack: Vec<LedgerSnapshot>,
}

impl Default for RunLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tally: RunTally::default(),
            profit_history: vec![ProfitPoint::ORIGIN],
            undo_stack: Vec::new(),
        }
    }

    /// Rebuild a ledger from persisted parts, repairing anything that would
    /// break the invariants.
    ///
    /// Tallies are normalized. A profit curve that does not end at the
    /// tally's run count is replaced by a bare origin, and an undo stack that
    /// does not step back one run at a time from the tally is dropped.
    #[must_use]
    pub fn restore(
        tally: RunTally,
        mut profit_history: Vec<ProfitPoint>,
        undo_stack: Vec<LedgerSnapshot>,
    ) -> Self {
        let tally = tally.normalized();
        if profit_history.first() != Some(&ProfitPoint::ORIGIN) {
            profit_history.insert(0, ProfitPoint::ORIGIN);
        }
        let mut undo_stack: Vec<LedgerSnapshot> = undo_stack
            .into_iter()
            .map(|snapshot| LedgerSnapshot {
                tally: snapshot.tally.normalized(),
                profit_history: snapshot.profit_history,
            })
            .collect();
        if !curve_matches(&tally, &profit_history) {
            warn!(
                "Profit history does not end at run {}; starting a new curve",
                tally.total
            );
            profit_history = vec![ProfitPoint::ORIGIN];
            undo_stack.clear();
        } else if !undo_chain_matches(&tally, &undo_stack) {
            warn!(
                "Discarding undo history that does not lead to run {}",
                tally.total
            );
            undo_stack.clear();
        }
        Self {
            tally,
            profit_history,
            undo_stack,
        }
    }

    #[must_use]
    pub const fn tally(&self) -> &RunTally {
        &self.tally
    }

    #[must_use]
    pub fn profit_history(&self) -> &[ProfitPoint] {
        &self.profit_history
    }

    #[must_use]
    pub fn undo_stack(&self) -> &[LedgerSnapshot] {
        &self.undo_stack
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn record_drop(&mut self, config: &RunConfig) {
        self.record(RunOutcome::Drop, config);
    }

    pub fn record_no_drop(&mut self, config: &RunConfig) {
        self.record(RunOutcome::NoDrop, config);
    }

    /// Snapshot, apply the outcome, then extend the profit curve.
    pub fn record(&mut self, outcome: RunOutcome, config: &RunConfig) {
        self.undo_stack.push(LedgerSnapshot {
            tally: self.tally,
            profit_history: self.profit_history.clone(),
        });
        self.tally.apply(outcome, config);
        self.profit_history.push(ProfitPoint {
            run: self.tally.total,
            profit: self.tally.net_profit,
        });
    }

    /// Roll back the most recent outcome. Returns `false` when there was
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.tally = snapshot.tally;
        self.profit_history = snapshot.profit_history;
        true
    }

    /// Zero the counters, the curve and the undo history.
    pub fn reset_statistics(&mut self) {
        *self = Self::new();
    }

    /// Share of runs that dropped, in `[0, 1]`.
    #[must_use]
    pub fn drop_rate(&self) -> f64 {
        guarded_ratio(f64::from(self.tally.drops), f64::from(self.tally.total))
    }

    #[must_use]
    pub fn drop_rate_percent(&self) -> f64 {
        self.drop_rate() * 100.0
    }

    /// Observed throughput over the elapsed session time.
    #[must_use]
    pub fn runs_per_hour(&self, elapsed_secs: u64) -> f64 {
        if self.tally.total == 0 {
            return 0.0;
        }
        guarded_ratio(f64::from(self.tally.total), u64_to_f64(elapsed_secs)) * SECONDS_PER_HOUR
    }

    /// Session-average profit per run scaled by the observed throughput.
    ///
    /// This is an estimate over the whole session, not a rolling window, so
    /// it lags behind a mid-session change of strategy.
    #[must_use]
    pub fn estimated_profit_per_hour(&self, elapsed_secs: u64) -> f64 {
        if self.tally.total == 0 {
            return 0.0;
        }
        let per_run = guarded_ratio(self.tally.net_profit, f64::from(self.tally.total));
        per_run * self.runs_per_hour(elapsed_secs)
    }
}

/// Origin first, strictly increasing runs, last point at the tally's count.
fn curve_matches(tally: &RunTally, history: &[ProfitPoint]) -> bool {
    history.first() == Some(&ProfitPoint::ORIGIN)
        && history.windows(2).all(|pair| pair[0].run < pair[1].run)
        && history.last().is_some_and(|point| point.run == tally.total)
}

/// Each snapshot must be exactly one run behind the one above it, ending one
/// run behind `tally`.
fn undo_chain_matches(tally: &RunTally, undo_stack: &[LedgerSnapshot]) -> bool {
    let Ok(depth) = u32::try_from(undo_stack.len()) else {
        return false;
    };
    let Some(base) = tally.total.checked_sub(depth) else {
        return false;
    };
    undo_stack.iter().zip(base..).all(|(snapshot, expected_total)| {
        snapshot.tally.total == expected_total
            && curve_matches(&snapshot.tally, &snapshot.profit_history)
    })
}
