//! Fixed-period tick scheduling
//!
//! The host loop (requestAnimationFrame on the web) polls with wall-clock
//! timestamps; the scheduler answers how many ticks are due.

use crate::consts::MAX_CATCH_UP_TICKS;

/// Fixed-period accumulator that only runs while armed
#[derive(Debug, Clone)]
pub struct TickScheduler {
    period_ms: f64,
    /// Timestamp of the last accounted poll; `None` while cancelled
    last_ms: Option<f64>,
    accumulator_ms: f64,
}

impl TickScheduler {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            last_ms: None,
            accumulator_ms: 0.0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.last_ms.is_some()
    }

    /// Start (or restart) the schedule; the first tick is one period away
    pub fn arm(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
        self.accumulator_ms = 0.0;
    }

    /// Stop ticking and drop any partial period
    pub fn cancel(&mut self) {
        self.last_ms = None;
        self.accumulator_ms = 0.0;
    }

    /// Number of ticks due at `now_ms`
    ///
    /// Capped to prevent a burst after the tab was throttled; the excess
    /// time is discarded.
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_ms else {
            return 0;
        };
        // Clocks going backwards count as no time passing
        self.accumulator_ms += (now_ms - last).max(0.0);
        self.last_ms = Some(now_ms);

        let due = (self.accumulator_ms / self.period_ms).floor();
        if due >= MAX_CATCH_UP_TICKS as f64 {
            self.accumulator_ms = 0.0;
            return MAX_CATCH_UP_TICKS;
        }
        self.accumulator_ms -= due * self.period_ms;
        due as u32
    }
}
