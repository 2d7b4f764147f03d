//! Interrupt-to-main-loop mailbox.
//!
//! The timer and lap-advance interrupt handlers only bump counters here. The
//! main loop drains them once per iteration and applies the effects itself,
//! so the stopwatch data has a single writer.

use core::cell::Cell;
use critical_section::Mutex;

/// Events collected since the last [`Signals::take`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pending {
    /// Timer ticks delivered.
    pub ticks: u32,

    /// Lap-advance edges delivered.
    pub lap_advances: u32,
}

impl Pending {
    /// True if nothing arrived.
    pub fn is_empty(&self) -> bool {
        self.ticks == 0 && self.lap_advances == 0
    }
}

/// Counters shared between interrupt handlers and the main loop.
///
/// Meant to live in a `static`:
///
/// ```rust,ignore
/// static SIGNALS: Signals = Signals::new();
///
/// #[interrupt]
/// fn TIM2() {
///     // acknowledge the timer, then:
///     SIGNALS.tick();
/// }
/// ```
pub struct Signals {
    ticks: Mutex<Cell<u32>>,
    lap_advances: Mutex<Cell<u32>>,
}

impl Signals {
    pub const fn new() -> Self {
        Self {
            ticks: Mutex::new(Cell::new(0)),
            lap_advances: Mutex::new(Cell::new(0)),
        }
    }

    /// Records one timer tick. Call from the timer interrupt.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().saturating_add(1));
        });
    }

    /// Records one lap-advance edge. Call from the edge interrupt.
    pub fn lap_advance(&self) {
        critical_section::with(|cs| {
            let advances = self.lap_advances.borrow(cs);
            advances.set(advances.get().saturating_add(1));
        });
    }

    /// Returns everything pending and zeroes the counters.
    pub fn take(&self) -> Pending {
        critical_section::with(|cs| Pending {
            ticks: self.ticks.borrow(cs).replace(0),
            lap_advances: self.lap_advances.borrow(cs).replace(0),
        })
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}
