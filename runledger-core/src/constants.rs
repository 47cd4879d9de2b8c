//! Centralized defaults and tuning constants for runledger logic.
//!
//! Defaults mirror the values players start from on a fresh install; the
//! storage keys stay stable so existing saves keep loading.

// Time units -----------------------------------------------------------------
pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60_000;
pub const MS_PER_HOUR: u64 = 3_600_000;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Cadence the web ticker redraws the clock at.
pub const DISPLAY_REFRESH_MS: u32 = 10;

// Tracker defaults -------------------------------------------------------------
pub const DEFAULT_KEY_COST: f64 = 14.0;
pub const DEFAULT_DROP_VALUE: f64 = 52.0;
pub const DEFAULT_MARKET_TAX_PERCENT: f64 = 12.5;

// Calculator defaults ----------------------------------------------------------
pub const CALC_DEFAULT_DROP_RATE_PERCENT: f64 = 50.0;
pub const CALC_DEFAULT_RUNS_PER_HOUR: f64 = 80.0;
pub const CALC_DEFAULT_NUMBER_OF_RUNS: f64 = 80.0;

// Strategy comparison ----------------------------------------------------------
/// Tax applied to every strategy in the comparison view.
pub const COMPARISON_TAX_PERCENT: f64 = 12.5;

pub const STRATEGY_ONE_LABEL: &str = "3 Key Keegan";
pub const STRATEGY_ONE_KEY_COST: f64 = 13.5;
pub const STRATEGY_ONE_DROP_CHANCE: f64 = 50.0;
pub const STRATEGY_ONE_DROP_VALUE: f64 = 48.0;
pub const STRATEGY_ONE_RPH: f64 = 81.0;

pub const STRATEGY_TWO_LABEL: &str = "4 Key Keegan Uber";
pub const STRATEGY_TWO_KEY_COST: f64 = 31.5;
pub const STRATEGY_TWO_DROP_CHANCE: f64 = 100.0;
pub const STRATEGY_TWO_DROP_VALUE: f64 = 48.0;
pub const STRATEGY_TWO_RPH: f64 = 40.0;

// Prompts ----------------------------------------------------------------------
pub const RESET_STATISTICS_PROMPT: &str =
    "Are you sure you want to reset all statistics? This action cannot be undone.";

// Storage keys -----------------------------------------------------------------
pub const KEY_CURRENT_PAGE: &str = "currentPage";
pub const KEY_TRACKER_TIMER: &str = "runTrackerTimer";
pub const KEY_TRACKER_RUNS: &str = "runTrackerRuns";
pub const KEY_TRACKER_CONFIG: &str = "runTrackerConfig";
pub const KEY_TRACKER_UNDO: &str = "runTrackerActionsHistory";
pub const KEY_TRACKER_PROFIT_HISTORY: &str = "runTrackerProfitHistory";
pub const KEY_CALCULATOR: &str = "profitCalculatorState";
pub const KEY_STRATEGY_ONE: &str = "strat1Data";
pub const KEY_STRATEGY_TWO: &str = "strat2Data";
