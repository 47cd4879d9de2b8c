use runledger_core::constants::{
    KEY_CALCULATOR, KEY_CURRENT_PAGE, KEY_STRATEGY_ONE, KEY_STRATEGY_TWO, KEY_TRACKER_CONFIG,
    KEY_TRACKER_PROFIT_HISTORY, KEY_TRACKER_RUNS, KEY_TRACKER_TIMER, KEY_TRACKER_UNDO,
};
use runledger_core::{
    AppState, CalculatorField, ConfigField, Decision, KeyValueStore, ManualTime, MemoryStore,
    NumberField, Page, ProfitPoint, Slot, StrategyField, TrackerSession,
};
use serde_json::Value;

const START_MS: i64 = 1_700_000_000_000;

fn stored_json(store: &MemoryStore, key: &str) -> Value {
    let raw = store.read(key).unwrap().unwrap_or_else(|| panic!("{key} missing"));
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn fresh_store_loads_defaults_without_writing() {
    let store = MemoryStore::new();
    let app = AppState::load(store.clone(), ManualTime::starting_at(START_MS));
    assert_eq!(app.page(), Page::Tracker);
    assert_eq!(app.tracker().ledger().tally().total(), 0);
    assert!(!app.tracker().clock().is_running());
    assert!(store.is_empty());
}

#[test]
fn every_intent_lands_under_its_key() {
    let store = MemoryStore::new();
    let time = ManualTime::starting_at(START_MS);
    let mut app = AppState::load(store.clone(), time.clone());

    app.navigate(Page::Calculator);
    app.tracker_mut().start_timer();
    app.tracker_mut().record_drop();
    app.tracker_mut().edit_config(ConfigField::KeyCost, "20");
    app.edit_calculator(CalculatorField::DropRate, "25");
    app.edit_strategy(Slot::First, StrategyField::Name, "Solo farm");
    app.edit_strategy(Slot::Second, StrategyField::RunsPerHour, "55");

    for key in [
        KEY_CURRENT_PAGE,
        KEY_TRACKER_TIMER,
        KEY_TRACKER_RUNS,
        KEY_TRACKER_PROFIT_HISTORY,
        KEY_TRACKER_UNDO,
        KEY_TRACKER_CONFIG,
        KEY_CALCULATOR,
        KEY_STRATEGY_ONE,
        KEY_STRATEGY_TWO,
    ] {
        assert!(store.raw(key).is_some(), "{key} was never saved");
    }

    let timer = stored_json(&store, KEY_TRACKER_TIMER);
    assert_eq!(timer["isRunning"], Value::Bool(true));
    assert_eq!(timer["timerStartTime"], Value::from(START_MS));
    let config = stored_json(&store, KEY_TRACKER_CONFIG);
    assert_eq!(config["keyCost"], Value::from(20.0));
    let strategy = stored_json(&store, KEY_STRATEGY_ONE);
    assert_eq!(strategy["name"], Value::from("Solo farm"));
    assert_eq!(stored_json(&store, KEY_STRATEGY_TWO)["rph"], Value::from(55.0));
}

#[test]
fn reload_resumes_a_running_session() {
    let store = MemoryStore::new();
    let time = ManualTime::starting_at(START_MS);
    {
        let mut app = AppState::load(store.clone(), time.clone());
        app.tracker_mut().start_timer();
        time.advance(30_000);
        app.tracker_mut().record_drop();
        app.tracker_mut().record_no_drop();
    }

    // The page was closed for a minute; the clock kept running.
    time.advance(60_000);
    let mut app = AppState::load(store, time.clone());
    let stats = app.tracker().snapshot();
    assert!(stats.running);
    assert_eq!(stats.elapsed_ms, 90_000);
    assert_eq!(stats.total, 2);
    assert!((stats.runs_per_hour - 80.0).abs() < 1e-9);
    assert!(stats.can_undo);

    assert!(app.tracker_mut().undo());
    assert_eq!(app.tracker().snapshot().total, 1);
}

#[test]
fn confirmed_reset_survives_reload() {
    let store = MemoryStore::new();
    let time = ManualTime::starting_at(START_MS);
    let mut app = AppState::load(store.clone(), time.clone());
    app.tracker_mut().edit_config(ConfigField::DropValue, "80");
    app.tracker_mut().start_timer();
    app.tracker_mut().record_drop();
    time.advance(5_000);

    let prompt = app.tracker().request_reset_statistics();
    assert!(app.tracker_mut().resolve(prompt, Decision::Confirm));

    let reopened = AppState::load(store, time);
    let stats = reopened.tracker().snapshot();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.elapsed_ms, 0);
    assert!(!stats.can_undo);
    assert_eq!(reopened.tracker().config().drop_value, NumberField::Value(80.0));
}

#[test]
fn corrupt_slots_fall_back_independently() {
    let store = MemoryStore::new();
    store.insert_raw(KEY_CURRENT_PAGE, "\"stratEfficiency\"");
    store.insert_raw(KEY_TRACKER_RUNS, "{{{");
    store.insert_raw(KEY_CALCULATOR, r#"{"keyCost":"abc","runsPerHour":"40"}"#);
    store.insert_raw(KEY_STRATEGY_ONE, "null");

    let app = AppState::load(store, ManualTime::starting_at(START_MS));
    assert_eq!(app.page(), Page::StratEfficiency);
    assert_eq!(app.tracker().ledger().tally().total(), 0);
    assert_eq!(app.calculator().key_cost, NumberField::Value(14.0));
    assert_eq!(app.calculator().runs_per_hour, NumberField::Value(40.0));
    assert_eq!(app.calculator().number_of_runs, NumberField::Value(80.0));
    assert_eq!(app.strategy(Slot::First).name, "3 Key Keegan");
}

#[test]
fn corrupt_tally_does_not_leave_a_stale_curve_behind() {
    let store = MemoryStore::new();
    let time = ManualTime::starting_at(START_MS);
    {
        let mut session = TrackerSession::new(store.clone(), time.clone());
        session.record_drop();
        session.record_no_drop();
    }
    store.insert_raw(KEY_TRACKER_RUNS, "{{{");

    let mut session = TrackerSession::restore(store.clone(), time);
    assert_eq!(session.ledger().profit_history(), &[ProfitPoint::ORIGIN]);
    assert!(!session.ledger().can_undo());

    session.record_drop();
    let history = session.ledger().profit_history();
    assert_eq!(session.ledger().tally().total(), 1);
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].run, 1);

    let saved: Vec<ProfitPoint> =
        serde_json::from_value(stored_json(&store, KEY_TRACKER_PROFIT_HISTORY)).unwrap();
    assert_eq!(saved, history);
}

#[test]
fn browser_save_format_reopens_with_time_and_config() {
    let store = MemoryStore::new();
    store.insert_raw(
        KEY_TRACKER_TIMER,
        &format!(
            r#"{{"hours":0,"minutes":1,"seconds":30,"milliseconds":0,"isRunning":true,
                "elapsedTimeWhenPaused":60000,"timerStartTime":{}}}"#,
            START_MS - 30_000
        ),
    );
    store.insert_raw(
        KEY_TRACKER_RUNS,
        r#"{"total":1,"drops":1,"noDrops":0,"dropStreak":1,"noDropStreak":0,"keyCost":20,
            "dropValue":"60","marketTax":10,"totalSpent":20,"totalEarned":54,"netProfit":34}"#,
    );
    store.insert_raw(
        KEY_TRACKER_PROFIT_HISTORY,
        r#"[{"run":0,"profit":0},{"run":1,"profit":34}]"#,
    );

    let session = TrackerSession::restore(store, ManualTime::starting_at(START_MS));
    assert!(session.clock().is_running());
    assert_eq!(session.elapsed_ms(), 90_000);
    assert_eq!(session.config().key_cost, NumberField::Value(20.0));
    assert_eq!(session.config().drop_value, NumberField::Value(60.0));
    assert!((session.config().market_tax_percent - 10.0).abs() < f64::EPSILON);
    assert_eq!(session.ledger().tally().total(), 1);
    assert_eq!(session.ledger().profit_history().len(), 2);
}

#[test]
fn dedicated_config_slot_wins_over_embedded_economics() {
    let store = MemoryStore::new();
    store.insert_raw(
        KEY_TRACKER_RUNS,
        r#"{"keyCost":20,"dropValue":60,"marketTax":10}"#,
    );
    store.insert_raw(KEY_TRACKER_CONFIG, r#"{"keyCost":9}"#);

    let session = TrackerSession::restore(store, ManualTime::starting_at(START_MS));
    assert_eq!(session.config().key_cost, NumberField::Value(9.0));
    assert_eq!(session.config().drop_value, NumberField::Value(60.0));
}
