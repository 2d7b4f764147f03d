//! Main-loop glue tying inputs, the state machine and the front panel together.
//!
//! Provides [`Device`], which owns the hardware handles and a [`Stopwatch`]
//! and runs one cooperative loop iteration per [`Device::run_once`] call.

use crate::buzzer;
use crate::config::Config;
use crate::display::{self, FrontPanel};
use crate::keypad::{ButtonEvent, ButtonInput, IncrementButton, KeyEvent, KeyInput, KeypadMatrix};
use crate::machine::{Action, Stopwatch, SystemState, Trigger};
use crate::signals::{Pending, Signals};
use embedded_hal::delay::DelayNs;

/// What happened during one main-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    /// Interrupt signals drained at the start of the iteration.
    pub pending: Pending,

    /// Action triggered by a key release, if any.
    pub key_action: Option<Action>,

    /// Action triggered by the increment button, if any.
    pub button_action: Option<Action>,

    /// The alarm sounded.
    pub alarm_sounded: bool,
}

/// A complete stopwatch device.
///
/// # Type Parameters
/// * `'s` - Lifetime of the shared interrupt signals
/// * `M` - Keypad matrix implementation
/// * `B` - Alarm-increment button implementation
/// * `P` - Front panel implementation
/// * `D` - Blocking delay provider
pub struct Device<'s, M: KeypadMatrix, B: IncrementButton, P: FrontPanel, D: DelayNs> {
    stopwatch: Stopwatch,
    config: Config,
    keys: KeyInput,
    button: ButtonInput,
    matrix: M,
    increment: B,
    panel: P,
    delay: D,
    signals: &'s Signals,
}

impl<'s, M, B, P, D> Device<'s, M, B, P, D>
where
    M: KeypadMatrix,
    B: IncrementButton,
    P: FrontPanel,
    D: DelayNs,
{
    /// Creates an idle device and turns the buzzer and heartbeat off.
    pub fn new(
        config: Config,
        matrix: M,
        increment: B,
        mut panel: P,
        delay: D,
        signals: &'s Signals,
    ) -> Self {
        panel.set_buzzer(false);
        panel.set_heartbeat(false);

        Self {
            stopwatch: Stopwatch::new(&config),
            keys: KeyInput::new(config.debounce_samples()),
            button: ButtonInput::new(config.debounce_samples()),
            config,
            matrix,
            increment,
            panel,
            delay,
            signals,
        }
    }

    /// Runs one main-loop iteration.
    ///
    /// 1. Applies ticks and lap-advance edges queued by interrupts.
    /// 2. Polls the keypad and the increment button; releases trigger actions.
    ///    A held keypad key locks out the button. In AlarmSet a held button
    ///    locks out the keypad, and a button release takes precedence over a
    ///    key release seen in the same iteration.
    /// 3. Steps the state machine and sounds the alarm if it fired.
    /// 4. Refreshes the display.
    pub fn run_once(&mut self) -> Cycle {
        let mut cycle = Cycle {
            pending: self.drain_signals(),
            ..Cycle::default()
        };

        let key_released = match self.keys.poll(&mut self.matrix) {
            Some(KeyEvent::Released(code)) => Some(code),
            _ => None,
        };
        let button_released = self.button.poll(&mut self.increment) == Some(ButtonEvent::Released)
            && self.keys.held().is_none();

        if self.stopwatch.state() == SystemState::AlarmSet {
            if button_released {
                cycle.button_action = self.stopwatch.handle(Trigger::AlarmIncrement);
                if let Some(code) = key_released {
                    debug!("key {} dropped behind alarm increment", code.id());
                }
            } else if let Some(code) = key_released.filter(|_| !self.button.is_held()) {
                cycle.key_action = self.stopwatch.press(code);
            }
        } else {
            if let Some(code) = key_released {
                cycle.key_action = self.stopwatch.press(code);
            }
            if button_released {
                cycle.button_action = self.stopwatch.handle(Trigger::AlarmIncrement);
            }
        }

        if self.stopwatch.step().sound_alarm {
            buzzer::sound(&mut self.panel, &mut self.delay, self.config.buzzer());
            cycle.alarm_sounded = true;
        }

        let frame = display::present(&self.stopwatch);
        display::refresh(&frame, &mut self.panel, &mut self.delay, self.config.digit_hold_us());

        cycle
    }

    /// Runs the main loop forever.
    pub fn run(&mut self) -> ! {
        info!("stopwatch running, tick period {} ms", self.config.tick_period_ms());

        loop {
            self.run_once();
        }
    }

    fn drain_signals(&mut self) -> Pending {
        let pending = self.signals.take();

        if pending.ticks > 1 {
            trace!("draining {} ticks", pending.ticks);
        }

        for _ in 0..pending.ticks {
            if self.stopwatch.tick() {
                self.panel.set_heartbeat(self.stopwatch.heartbeat());
            }
        }

        for _ in 0..pending.lap_advances {
            self.stopwatch.handle(Trigger::LapAdvance);
        }

        pending
    }

    /// Returns the state machine.
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the front panel.
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Gives back the hardware handles.
    pub fn release(self) -> (M, B, P, D) {
        (self.matrix, self.increment, self.panel, self.delay)
    }
}
