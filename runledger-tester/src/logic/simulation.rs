use anyhow::{Result, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use runledger_core::{
    ConfigField, ManualTime, MemoryStore, ProfitPoint, RunOutcome, TimeSource, TrackerSession,
};

/// Wall-clock origin for simulated sessions.
pub const SIMULATION_EPOCH_MS: i64 = 1_700_000_000_000;

const NET_PROFIT_TOLERANCE: f64 = 1e-6;

/// Configuration for a simulated farming session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub drop_chance: f64,
    pub key_cost: f64,
    pub drop_value: f64,
    pub min_run_ms: i64,
    pub max_run_ms: i64,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            drop_chance: 0.5,
            key_cost: 14.0,
            drop_value: 52.0,
            min_run_ms: 30_000,
            max_run_ms: 60_000,
        }
    }

    #[must_use]
    pub fn with_drop_chance(mut self, drop_chance: f64) -> Self {
        self.drop_chance = drop_chance.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub const fn with_economics(mut self, key_cost: f64, drop_value: f64) -> Self {
        self.key_cost = key_cost;
        self.drop_value = drop_value;
        self
    }
}

/// Deterministic player driving a tracker session against an in-memory store.
pub struct SessionSimulator {
    session: TrackerSession<MemoryStore, ManualTime>,
    store: MemoryStore,
    time: ManualTime,
    rng: ChaCha20Rng,
    config: SimulationConfig,
}

impl SessionSimulator {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let store = MemoryStore::new();
        let time = ManualTime::starting_at(SIMULATION_EPOCH_MS);
        let mut session = TrackerSession::new(store.clone(), time.clone());
        session.edit_config(ConfigField::KeyCost, &config.key_cost.to_string());
        session.edit_config(ConfigField::DropValue, &config.drop_value.to_string());
        session.start_timer();
        Self {
            session,
            store,
            time,
            rng: ChaCha20Rng::seed_from_u64(config.seed),
            config,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &TrackerSession<MemoryStore, ManualTime> {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut TrackerSession<MemoryStore, ManualTime> {
        &mut self.session
    }

    #[must_use]
    pub const fn time(&self) -> &ManualTime {
        &self.time
    }

    /// Spend a run's worth of wall time, then record its outcome.
    pub fn play_run(&mut self) -> RunOutcome {
        let spent = self
            .rng
            .gen_range(self.config.min_run_ms..=self.config.max_run_ms);
        self.time.advance(spent);
        let outcome = if self.rng.gen_bool(self.config.drop_chance) {
            RunOutcome::Drop
        } else {
            RunOutcome::NoDrop
        };
        self.session.record(outcome);
        outcome
    }

    pub fn play(&mut self, runs: usize) {
        for _ in 0..runs {
            self.play_run();
        }
    }

    /// Reopen whatever the session persisted, as a page reload would.
    #[must_use]
    pub fn reopen(&self) -> TrackerSession<MemoryStore, ManualTime> {
        TrackerSession::restore(self.store.clone(), self.time.clone())
    }

    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.time.now_ms()
    }
}

/// Ledger invariants that must hold after every intent.
pub fn check_invariants<S, T>(session: &TrackerSession<S, T>) -> Result<()>
where
    S: runledger_core::KeyValueStore,
    T: TimeSource,
{
    let ledger = session.ledger();
    let tally = ledger.tally();
    ensure!(
        tally.total() == tally.drops() + tally.no_drops(),
        "total {} != drops {} + no drops {}",
        tally.total(),
        tally.drops(),
        tally.no_drops()
    );
    ensure!(
        tally.drop_streak() == 0 || tally.no_drop_streak() == 0,
        "both streaks active ({} / {})",
        tally.drop_streak(),
        tally.no_drop_streak()
    );
    let expected_net = tally.total_earned() - tally.total_spent();
    ensure!(
        (tally.net_profit() - expected_net).abs() <= NET_PROFIT_TOLERANCE,
        "net profit {} drifted from earned - spent {expected_net}",
        tally.net_profit()
    );
    let history = ledger.profit_history();
    ensure!(
        history.first() == Some(&ProfitPoint::ORIGIN),
        "profit history lost its origin point"
    );
    ensure!(
        history.len() == tally.total() as usize + 1,
        "history has {} points for {} runs",
        history.len(),
        tally.total()
    );
    let stats = session.snapshot();
    ensure!(
        (0.0..=100.0).contains(&stats.drop_rate_percent),
        "drop rate {} out of range",
        stats.drop_rate_percent
    );
    ensure!(
        stats.runs_per_hour.is_finite() && stats.estimated_profit_per_hour.is_finite(),
        "non-finite hourly figures"
    );
    Ok(())
}
