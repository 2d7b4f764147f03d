//! Tick-driven time base for the stopwatch.

use crate::types::Ticks;

/// Elapsed-time accumulator advanced by the periodic timer.
///
/// Counts only while the stopwatch is counting. Each counted tick also flips
/// the heartbeat indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeBase {
    elapsed: Ticks,
    heartbeat: bool,
}

impl TimeBase {
    /// Creates a time base at zero with the heartbeat off.
    pub const fn new() -> Self {
        Self {
            elapsed: 0,
            heartbeat: false,
        }
    }

    /// Applies one timer tick.
    ///
    /// Returns true if the tick was counted. Ticks delivered while not
    /// counting have no effect.
    pub fn on_tick(&mut self, counting: bool) -> bool {
        if !counting {
            return false;
        }

        self.elapsed = self.elapsed.wrapping_add(1);
        self.heartbeat = !self.heartbeat;
        true
    }

    /// Returns the elapsed ticks.
    #[inline]
    pub fn elapsed(&self) -> Ticks {
        self.elapsed
    }

    /// Returns the elapsed time in milliseconds for a given tick period.
    pub fn elapsed_millis(&self, tick_period_ms: u32) -> u64 {
        self.elapsed as u64 * tick_period_ms as u64
    }

    /// Current heartbeat indicator level.
    #[inline]
    pub fn heartbeat(&self) -> bool {
        self.heartbeat
    }

    /// Clears the elapsed count. The heartbeat level is left as is.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
