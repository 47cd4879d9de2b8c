//! Runledger Engine
//!
//! Platform-agnostic run tracking, profit projection and strategy comparison
//! for a loot-farming companion app. This crate holds all arithmetic and state
//! transitions without UI or platform-specific dependencies; persistence and
//! wall-clock time come in through the [`KeyValueStore`] and [`TimeSource`]
//! traits.

pub mod app;
pub mod calculator;
pub mod clock;
pub mod comparator;
pub mod config;
pub mod constants;
pub mod input;
pub mod ledger;
pub mod numbers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use app::{AppState, Page};
pub use calculator::{CalculatorForm, Projection, ProjectionInputs, project};
pub use clock::{ClockState, ElapsedParts, ManualTime, SystemTimeSource, TimeSource};
pub use comparator::{
    BreakEven, ComparisonReport, Slot, StrategyMetrics, StrategyParams, Verdict, compare,
};
pub use config::{ConfigError, RunConfig};
pub use input::{CalculatorField, ConfigField, NumberField, StrategyField};
pub use ledger::{LedgerSnapshot, ProfitPoint, RunLedger, RunOutcome, RunTally};
pub use session::{ConfirmPrompt, Decision, PendingAction, TrackerSession, TrackerStats};
pub use storage::{KeyValueStore, MemoryStore, load_state, save_state};
