//! Stopwatch state machine.
//!
//! Provides [`Stopwatch`], which owns the elapsed time, alarm threshold and
//! lap store, and changes them in response to [`Trigger`]s. Every trigger is
//! first mapped to an [`Action`] by the current state's handler (see
//! [`SystemState::action_for`]); triggers a state does not handle are ignored.

use crate::config::{AlarmPolicy, Config};
use crate::laps::{LapRecord, LapStore};
use crate::time::TimeBase;
use crate::types::{AlarmTime, KeyCode, Ticks};

/// The current mode of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemState {
    /// Stopped at the power-on or reset display.
    #[default]
    Idle,
    /// Editing the alarm threshold.
    AlarmSet,
    /// Elapsed time advancing with each tick.
    Counting,
    /// Elapsed time frozen.
    Paused,
    /// Reviewing recorded laps.
    Check,
}

/// A discrete input the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Key 1. Handled identically in every state.
    StartPause,
    /// Key 3.
    AlarmKey,
    /// Key 5.
    ReviewKey,
    /// Key 9.
    LapResetKey,
    /// Alarm-increment button released.
    AlarmIncrement,
    /// Lap-advance edge from the review button.
    LapAdvance,
}

impl Trigger {
    /// Maps a keypad key to its trigger. Keys without a function map to `None`.
    pub fn from_key(code: KeyCode) -> Option<Trigger> {
        match code {
            KeyCode::START_PAUSE => Some(Trigger::StartPause),
            KeyCode::ALARM => Some(Trigger::AlarmKey),
            KeyCode::REVIEW => Some(Trigger::ReviewKey),
            KeyCode::LAP_RESET => Some(Trigger::LapResetKey),
            _ => None,
        }
    }
}

/// The effect a trigger has in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Flip the paused flag and go to Counting or Paused accordingly.
    ToggleRun,
    /// Idle -> AlarmSet.
    EnterAlarmSet,
    /// AlarmSet -> Idle.
    LeaveAlarmSet,
    /// Alarm threshold +1 second, wrapping at 60.
    IncrementAlarm,
    /// Store the time since the previous lap.
    RecordLap,
    /// Paused -> Idle, elapsed time back to zero.
    Reset,
    /// Paused -> Check.
    EnterCheck,
    /// Check -> Paused.
    LeaveCheck,
    /// Review cursor to the next slot.
    AdvanceReview,
}

impl SystemState {
    /// Transition table: the action `trigger` causes in this state, if any.
    ///
    /// `StartPause` is a global override and takes precedence over every
    /// state-specific handler.
    pub const fn action_for(self, trigger: Trigger) -> Option<Action> {
        if let Trigger::StartPause = trigger {
            return Some(Action::ToggleRun);
        }

        match self {
            SystemState::Idle => Self::idle_action(trigger),
            SystemState::AlarmSet => Self::alarm_set_action(trigger),
            SystemState::Counting => Self::counting_action(trigger),
            SystemState::Paused => Self::paused_action(trigger),
            SystemState::Check => Self::check_action(trigger),
        }
    }

    const fn idle_action(trigger: Trigger) -> Option<Action> {
        match trigger {
            Trigger::AlarmKey => Some(Action::EnterAlarmSet),
            _ => None,
        }
    }

    const fn alarm_set_action(trigger: Trigger) -> Option<Action> {
        match trigger {
            Trigger::AlarmIncrement => Some(Action::IncrementAlarm),
            Trigger::AlarmKey => Some(Action::LeaveAlarmSet),
            _ => None,
        }
    }

    const fn counting_action(trigger: Trigger) -> Option<Action> {
        match trigger {
            Trigger::LapResetKey => Some(Action::RecordLap),
            _ => None,
        }
    }

    const fn paused_action(trigger: Trigger) -> Option<Action> {
        match trigger {
            Trigger::LapResetKey => Some(Action::Reset),
            Trigger::ReviewKey => Some(Action::EnterCheck),
            _ => None,
        }
    }

    const fn check_action(trigger: Trigger) -> Option<Action> {
        match trigger {
            Trigger::ReviewKey => Some(Action::LeaveCheck),
            Trigger::LapAdvance => Some(Action::AdvanceReview),
            _ => None,
        }
    }
}

/// Result of one main-loop step of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepOutcome {
    /// The alarm condition fired; the caller should sound the buzzer.
    pub sound_alarm: bool,
}

/// Stopwatch/alarm controller.
///
/// Starts in [`SystemState::Idle`] with the paused flag set, so the first
/// start/pause press starts counting.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    state: SystemState,
    paused: bool,
    alarm: AlarmTime,
    alarm_policy: AlarmPolicy,
    alarm_latched: bool,
    time: TimeBase,
    laps: LapStore,
    tick_period_ms: u32,
}

impl Stopwatch {
    /// Creates an idle stopwatch.
    pub fn new(config: &Config) -> Self {
        Self {
            state: SystemState::Idle,
            paused: true,
            alarm: AlarmTime::default(),
            alarm_policy: config.alarm_policy(),
            alarm_latched: false,
            time: TimeBase::new(),
            laps: LapStore::new(),
            tick_period_ms: config.tick_period_ms(),
        }
    }

    /// Handles a key release. Keys without a function are ignored.
    pub fn press(&mut self, key: KeyCode) -> Option<Action> {
        Trigger::from_key(key).and_then(|trigger| self.handle(trigger))
    }

    /// Looks up and applies the action for `trigger` in the current state.
    ///
    /// Returns the applied action, or `None` if the state ignores the trigger.
    pub fn handle(&mut self, trigger: Trigger) -> Option<Action> {
        let action = self.state.action_for(trigger)?;
        self.apply(action);
        Some(action)
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleRun => {
                self.paused = !self.paused;
                let next = if self.paused {
                    SystemState::Paused
                } else {
                    SystemState::Counting
                };
                self.transition(next);
            }
            Action::EnterAlarmSet => self.transition(SystemState::AlarmSet),
            Action::LeaveAlarmSet => self.transition(SystemState::Idle),
            Action::IncrementAlarm => {
                self.alarm = self.alarm.incremented();
                debug!("alarm set to {}s", self.alarm.seconds());
            }
            Action::RecordLap => {
                self.laps.record_lap(self.time.elapsed());
            }
            Action::Reset => {
                self.time.reset();
                self.alarm_latched = false;
                self.transition(SystemState::Idle);
            }
            Action::EnterCheck => self.transition(SystemState::Check),
            Action::LeaveCheck => self.transition(SystemState::Paused),
            Action::AdvanceReview => {
                self.laps.advance_review();
            }
        }
    }

    fn transition(&mut self, next: SystemState) {
        if next != self.state {
            debug!("state {} -> {}", self.state, next);
        }
        self.state = next;
    }

    /// Applies one time base tick.
    ///
    /// Returns true if the tick was counted (only while `Counting`).
    pub fn tick(&mut self) -> bool {
        self.time.on_tick(self.state == SystemState::Counting)
    }

    /// Runs the per-iteration work of the current state.
    ///
    /// While paused the review cursor is held at slot 0. While counting the
    /// alarm condition is checked according to the configured [`AlarmPolicy`].
    pub fn step(&mut self) -> StepOutcome {
        match self.state {
            SystemState::Paused => {
                self.laps.reset_review_cursor();
                StepOutcome::default()
            }
            SystemState::Counting => StepOutcome {
                sound_alarm: self.check_alarm(),
            },
            _ => StepOutcome::default(),
        }
    }

    fn check_alarm(&mut self) -> bool {
        let hit = self.alarm.matches(self.time.elapsed());

        let fire = match self.alarm_policy {
            AlarmPolicy::WhileTrue => hit,
            AlarmPolicy::OncePerCrossing => hit && !self.alarm_latched,
        };
        self.alarm_latched = hit;

        if fire {
            info!(
                "alarm at {} ticks ({}s threshold)",
                self.time.elapsed(),
                self.alarm.seconds()
            );
        }

        fire
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Returns true if the start/pause toggle is in its paused position.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn alarm_time(&self) -> AlarmTime {
        self.alarm
    }

    /// Elapsed ticks since the last reset.
    #[inline]
    pub fn elapsed(&self) -> Ticks {
        self.time.elapsed()
    }

    /// Elapsed time in milliseconds, using the configured tick period.
    pub fn elapsed_millis(&self) -> u64 {
        self.time.elapsed_millis(self.tick_period_ms)
    }

    /// Heartbeat indicator level.
    #[inline]
    pub fn heartbeat(&self) -> bool {
        self.time.heartbeat()
    }

    /// Returns the lap store.
    #[inline]
    pub fn laps(&self) -> &LapStore {
        &self.laps
    }

    /// Lap under the review cursor.
    pub fn reviewed_lap(&self) -> LapRecord {
        self.laps.reviewed_lap()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Stopwatch::new(&Config::default())
    }
}
