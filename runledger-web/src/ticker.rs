//! Display refresh while the session clock runs.
//!
//! The ticker only prompts a redraw; elapsed time is always recomputed from
//! the clock state, so a late or skipped tick never loses time.
use gloo_timers::callback::Interval;
use log::debug;
use runledger_core::constants::DISPLAY_REFRESH_MS;
use std::fmt;

/// Owns at most one repeating timer. Dropping the ticker cancels it.
pub struct RefreshTicker {
    interval: Option<Interval>,
    period_ms: u32,
}

impl fmt::Debug for RefreshTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTicker")
            .field("active", &self.is_active())
            .field("period_ms", &self.period_ms)
            .finish()
    }
}

impl Default for RefreshTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshTicker {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_period(DISPLAY_REFRESH_MS)
    }

    #[must_use]
    pub const fn with_period(period_ms: u32) -> Self {
        Self {
            interval: None,
            period_ms,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking when `running` and idle, stop when not `running`.
    /// An already active ticker keeps its original callback.
    pub fn sync<F>(&mut self, running: bool, on_tick: F)
    where
        F: FnMut() + 'static,
    {
        match (running, self.interval.is_some()) {
            (true, false) => {
                debug!("refresh ticker started at {} ms", self.period_ms);
                self.interval = Some(Interval::new(self.period_ms, on_tick));
            }
            (false, true) => self.stop(),
            _ => {}
        }
    }

    pub fn stop(&mut self) {
        if let Some(interval) = self.interval.take() {
            interval.cancel();
            debug!("refresh ticker stopped");
        }
    }
}
