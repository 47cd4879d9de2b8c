//! Session stopwatch and time sources.
//!
//! The clock never ticks on its own. Every reading is recomputed from the
//! stored interval and a `now` sample, so a renderer may redraw at any
//! cadence (or after a reload) without drifting.
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::numbers::non_negative_ms;

/// Source of wall-clock milliseconds since the Unix epoch.
pub trait TimeSource {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by `std::time::SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Hand-driven clock shared between a session and whoever advances it.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<i64>>,
}

impl ManualTime {
    #[must_use]
    pub fn starting_at(now_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Running/paused stopwatch state.
///
/// Field names on the wire are the ones browser saves already carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockState {
    /// Time banked by completed intervals.
    #[serde(rename = "elapsedTimeWhenPaused", default)]
    accumulated_ms: u64,
    #[serde(rename = "isRunning", default)]
    running: bool,
    /// Epoch millis the current interval began; only meaningful while running.
    #[serde(rename = "timerStartTime", default)]
    started_at_ms: i64,
}

impl ClockState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accumulated_ms: 0,
            running: false,
            started_at_ms: 0,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    #[must_use]
    pub const fn started_at_ms(&self) -> i64 {
        self.started_at_ms
    }

    /// Begin a new interval. Calling this while already running keeps the
    /// original start so no time is counted twice.
    pub const fn start(&mut self, now_ms: i64) {
        if self.running {
            return;
        }
        self.running = true;
        self.started_at_ms = now_ms;
    }

    /// Bank the current interval and stop.
    pub fn pause(&mut self, now_ms: i64) {
        if !self.running {
            return;
        }
        self.accumulated_ms = self
            .accumulated_ms
            .saturating_add(non_negative_ms(now_ms.saturating_sub(self.started_at_ms)));
        self.running = false;
    }

    /// Discard all banked time and any interval in progress.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn elapsed_ms(&self, now_ms: i64) -> u64 {
        if self.running {
            self.accumulated_ms
                .saturating_add(non_negative_ms(now_ms.saturating_sub(self.started_at_ms)))
        } else {
            self.accumulated_ms
        }
    }

    /// Whole elapsed seconds, rounded down.
    #[must_use]
    pub fn elapsed_secs(&self, now_ms: i64) -> u64 {
        self.elapsed_ms(now_ms) / MS_PER_SECOND
    }
}

/// Elapsed time broken into display components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElapsedParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl ElapsedParts {
    #[must_use]
    pub const fn from_millis(total_ms: u64) -> Self {
        Self {
            hours: total_ms / MS_PER_HOUR,
            minutes: (total_ms / MS_PER_MINUTE) % 60,
            seconds: (total_ms / MS_PER_SECOND) % 60,
            millis: total_ms % MS_PER_SECOND,
        }
    }

    /// Hundredths of a second, the precision shown next to the seconds.
    #[must_use]
    pub const fn centis(&self) -> u64 {
        self.millis / 10
    }
}

impl fmt::Display for ElapsedParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours,
            self.minutes,
            self.seconds,
            self.centis()
        )
    }
}
