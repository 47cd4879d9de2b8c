//! Scenario catalog. Each scenario is a seeded check that either passes or
//! explains which property broke.
use anyhow::{Result, bail, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use runledger_core::constants::COMPARISON_TAX_PERCENT;
use runledger_core::{
    BreakEven, ClockState, Decision, NumberField, ProfitPoint, ProjectionInputs, Slot,
    StrategyMetrics, StrategyParams, Verdict, compare, project,
};

use super::simulation::{SIMULATION_EPOCH_MS, SessionSimulator, SimulationConfig, check_invariants};

/// Per-iteration inputs handed to a scenario.
pub struct ScenarioCtx {
    pub seed: u64,
    pub runs: usize,
    pub rng: ChaCha20Rng,
}

impl ScenarioCtx {
    #[must_use]
    pub fn new(seed: u64, runs: usize) -> Self {
        Self {
            seed,
            runs: runs.max(1),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn simulation(&mut self) -> SimulationConfig {
        let drop_chance = self.rng.gen_range(0.05..0.95);
        let key_cost = f64::from(self.rng.gen_range(0_u32..=40));
        let drop_value = f64::from(self.rng.gen_range(1_u32..=150));
        SimulationConfig::new(self.seed)
            .with_drop_chance(drop_chance)
            .with_economics(key_cost, drop_value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TestScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub run: fn(&mut ScenarioCtx) -> Result<()>,
}

const CATALOG: &[TestScenario] = &[
    TestScenario {
        name: "smoke",
        description: "Random outcomes keep tally and history invariants",
        run: smoke,
    },
    TestScenario {
        name: "undo-rollback",
        description: "Undo restores exact prior ledgers",
        run: undo_rollback,
    },
    TestScenario {
        name: "reset-preserves-config",
        description: "Confirmed reset zeroes statistics but keeps config",
        run: reset_preserves_config,
    },
    TestScenario {
        name: "clock-monotonic",
        description: "Elapsed time never decreases across start/pause",
        run: clock_monotonic,
    },
    TestScenario {
        name: "session-restore",
        description: "Reopened sessions account for time spent closed",
        run: session_restore,
    },
    TestScenario {
        name: "projection-agreement",
        description: "Realized profit per run converges to the projection",
        run: projection_agreement,
    },
    TestScenario {
        name: "comparator-breakeven",
        description: "Break-even RPH equalizes hourly profit",
        run: comparator_breakeven,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.name, s.description))
}

#[must_use]
pub fn scenario_names() -> Vec<String> {
    CATALOG.iter().map(|s| s.name.to_string()).collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    CATALOG.iter().find(|s| s.name == name).copied()
}

fn smoke(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut sim = SessionSimulator::new(ctx.simulation());
    check_invariants(sim.session())?;
    for _ in 0..ctx.runs {
        sim.play_run();
        check_invariants(sim.session())?;
    }
    let stats = sim.session().snapshot();
    ensure!(
        stats.total as usize == ctx.runs,
        "expected {} runs, tallied {}",
        ctx.runs,
        stats.total
    );
    ensure!(stats.runs_per_hour > 0.0, "running session reported no throughput");
    Ok(())
}

fn undo_rollback(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut sim = SessionSimulator::new(ctx.simulation());
    let warmup = ctx.rng.gen_range(0..=ctx.runs);
    sim.play(warmup);

    let before = sim.session().ledger().clone();
    sim.play_run();
    ensure!(sim.session_mut().undo(), "undo refused after a recorded run");
    let after = sim.session().ledger();
    ensure!(after.tally() == before.tally(), "single undo left a different tally");
    ensure!(
        after.profit_history() == before.profit_history(),
        "single undo left a different profit history"
    );

    let burst = ctx.rng.gen_range(1..=ctx.runs);
    sim.play(burst);
    for _ in 0..burst {
        ensure!(sim.session_mut().undo(), "undo stack ran out early");
        check_invariants(sim.session())?;
    }
    ensure!(
        sim.session().ledger().tally() == before.tally(),
        "{burst} undos did not return to the checkpoint"
    );
    Ok(())
}

fn reset_preserves_config(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut sim = SessionSimulator::new(ctx.simulation());
    sim.play(ctx.runs);
    let config = *sim.session().config();
    let total = sim.session().ledger().tally().total();

    let prompt = sim.session().request_reset_statistics();
    ensure!(
        !sim.session_mut().resolve(prompt, Decision::Cancel),
        "cancelled reset reported as run"
    );
    ensure!(
        sim.session().ledger().tally().total() == total,
        "cancelled reset changed the ledger"
    );

    let prompt = sim.session().request_reset_statistics();
    ensure!(
        sim.session_mut().resolve(prompt, Decision::Confirm),
        "confirmed reset did not run"
    );
    let session = sim.session();
    ensure!(session.ledger().tally().total() == 0, "tally survived reset");
    ensure!(
        session.ledger().profit_history() == [ProfitPoint::ORIGIN],
        "profit history survived reset"
    );
    ensure!(!session.ledger().can_undo(), "undo history survived reset");
    ensure!(session.elapsed_ms() == 0, "timer survived reset");
    ensure!(*session.config() == config, "reset changed the run config");

    let reopened = sim.reopen();
    ensure!(
        reopened.ledger().tally().total() == 0 && *reopened.config() == config,
        "persisted state disagrees with reset session"
    );
    Ok(())
}

fn clock_monotonic(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut clock = ClockState::new();
    let mut now = SIMULATION_EPOCH_MS;
    let mut last = 0_u64;
    for step in 0..ctx.runs {
        now += ctx.rng.gen_range(0_i64..5_000);
        match ctx.rng.gen_range(0_u8..3) {
            0 => clock.start(now),
            1 => {
                let before = clock.elapsed_ms(now);
                clock.pause(now);
                ensure!(
                    clock.elapsed_ms(now) == before,
                    "pause at step {step} changed elapsed {before} -> {}",
                    clock.elapsed_ms(now)
                );
                let idle = ctx.rng.gen_range(1_i64..60_000);
                ensure!(
                    clock.elapsed_ms(now + idle) == before,
                    "paused clock advanced"
                );
                now += idle;
                clock.start(now);
                ensure!(
                    clock.elapsed_ms(now) == before,
                    "resume at step {step} changed elapsed"
                );
            }
            _ => {}
        }
        let elapsed = clock.elapsed_ms(now);
        ensure!(
            elapsed >= last,
            "elapsed went backwards at step {step}: {last} -> {elapsed}"
        );
        last = elapsed;
    }
    Ok(())
}

fn session_restore(ctx: &mut ScenarioCtx) -> Result<()> {
    let mut sim = SessionSimulator::new(ctx.simulation());
    sim.play(ctx.runs);
    let elapsed = sim.session().elapsed_ms();
    let tally = *sim.session().ledger().tally();

    let closed_for = ctx.rng.gen_range(1_000_i64..3_600_000);
    sim.time().advance(closed_for);
    let reopened = sim.reopen();
    ensure!(reopened.clock().is_running(), "clock stopped across reload");
    let expected = elapsed + u64::try_from(closed_for)?;
    ensure!(
        reopened.elapsed_ms() == expected,
        "reopened elapsed {} != {expected}",
        reopened.elapsed_ms()
    );
    ensure!(*reopened.ledger().tally() == tally, "tally changed across reload");
    check_invariants(&reopened)?;
    Ok(())
}

fn projection_agreement(ctx: &mut ScenarioCtx) -> Result<()> {
    const MIN_RUNS: usize = 2_000;
    const SIGMAS: f64 = 5.0;

    let config = ctx.simulation();
    let runs = ctx.runs.max(MIN_RUNS);
    let mut sim = SessionSimulator::new(config);
    sim.play(runs);

    let tally = sim.session().ledger().tally();
    let realized = tally.net_profit() / f64::from(tally.total());
    let projection = project(&ProjectionInputs {
        key_cost: config.key_cost,
        drop_value: config.drop_value,
        drop_rate_percent: config.drop_chance * 100.0,
        runs_per_hour: 1.0,
        number_of_runs: 1.0,
        market_tax_percent: sim.session().config().market_tax_percent,
    });
    let net_drop = sim.session().config().net_drop_value();
    let sample_size = f64::from(tally.total());
    let sigma = net_drop * (config.drop_chance * (1.0 - config.drop_chance) / sample_size).sqrt();
    let gap = (realized - projection.net_profit).abs();
    ensure!(
        gap <= SIGMAS * sigma + 1e-9,
        "realized {realized:.3}/run vs projected {:.3}/run (gap {gap:.3}, sigma {sigma:.3})",
        projection.net_profit
    );
    Ok(())
}

fn random_strategy(rng: &mut ChaCha20Rng, label: &str) -> StrategyParams {
    StrategyParams {
        name: label.to_string(),
        key_cost: NumberField::new(f64::from(rng.gen_range(0_u32..=60))),
        drop_chance_percent: NumberField::new(f64::from(rng.gen_range(0_u32..=100))),
        drop_value: NumberField::new(f64::from(rng.gen_range(0_u32..=200))),
        runs_per_hour: NumberField::new(f64::from(rng.gen_range(0_u32..=120))),
    }
}

fn comparator_breakeven(ctx: &mut ScenarioCtx) -> Result<()> {
    const PAIRS: usize = 25;

    for pair in 0..PAIRS {
        let first = random_strategy(&mut ctx.rng, "A");
        let second = random_strategy(&mut ctx.rng, "B");
        let report = compare(&first, &second, COMPARISON_TAX_PERCENT);
        let Some(verdict) = report.verdict else {
            bail!("pair {pair}: complete strategies produced no verdict");
        };
        let Verdict::Leader {
            leader,
            margin_per_hour,
            break_even,
        } = verdict
        else {
            ensure!(
                (report.first.profit_per_hour - report.second.profit_per_hour).abs() < 1e-9,
                "pair {pair}: parity declared for unequal strategies"
            );
            continue;
        };
        let lead = report.metrics(leader);
        let lag = report.metrics(leader.other());
        ensure!(
            (margin_per_hour - (lead.profit_per_hour - lag.profit_per_hour)).abs() < 1e-6,
            "pair {pair}: margin {margin_per_hour} disagrees with metrics"
        );
        match break_even {
            BreakEven::Target(rph) => {
                let mut lagging = match leader {
                    Slot::First => second.clone(),
                    Slot::Second => first.clone(),
                };
                lagging.runs_per_hour = NumberField::new(rph);
                let matched = StrategyMetrics::evaluate(&lagging, COMPARISON_TAX_PERCENT);
                let scale = lead.profit_per_hour.abs().max(1.0);
                ensure!(
                    (matched.profit_per_hour - lead.profit_per_hour).abs() <= 1e-6 * scale,
                    "pair {pair}: {rph:.3} RPH yields {:.3}/h, leader makes {:.3}/h",
                    matched.profit_per_hour,
                    lead.profit_per_hour
                );
            }
            BreakEven::Unreachable => ensure!(
                lag.net_profit_per_run <= 0.0 && lead.profit_per_hour > 0.0,
                "pair {pair}: unreachable break-even for a profitable laggard"
            ),
            BreakEven::NotApplicable => ensure!(
                lead.profit_per_hour <= 0.0,
                "pair {pair}: break-even skipped although the leader profits"
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique_and_resolvable() {
        let names = scenario_names();
        for name in &names {
            assert!(get_scenario(name).is_some(), "{name} not resolvable");
        }
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
        assert!(get_scenario("nope").is_none());
    }

    #[test]
    fn every_scenario_passes_on_a_fixed_seed() {
        for scenario in CATALOG {
            let mut ctx = ScenarioCtx::new(1337, 40);
            if let Err(err) = (scenario.run)(&mut ctx) {
                panic!("{} failed: {err:#}", scenario.name);
            }
        }
    }
}
