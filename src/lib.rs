#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Stopwatch`**: The five-state controller (Idle, AlarmSet, Counting, Paused, Check)
//! - **`SystemState::action_for`**: Transition table mapping a `Trigger` to an `Action` per state
//! - **`LapStore`**: Ring buffer of the last five laps with write and review cursors
//! - **`TimeBase`**: Tick counter that only advances while counting
//! - **`KeyInput` / `ButtonInput`**: Debounced inputs reporting press/release edges
//! - **`Frame` / `present`**: What the four-digit display and indicator LEDs should show
//! - **`Signals`**: Mailbox filled by interrupt handlers and drained by the main loop
//! - **`Device`**: Main-loop glue over the `KeypadMatrix`, `IncrementButton` and `FrontPanel` traits
//!
//! One tick is one tenth of a second by default, and the display shows
//! elapsed time as minutes, seconds and tenths.

// Must come first so the logging macros are visible to the other modules.
mod fmt;

pub mod types;
pub mod config;
pub mod time;
pub mod signals;
pub mod keypad;
pub mod laps;
pub mod machine;
pub mod display;
pub mod buzzer;
pub mod device;

pub use types::{AlarmTime, DigitPosition, Indicator, KeyCode, Ticks, ALARM_MODULUS};
pub use config::{AlarmPolicy, BuzzerPattern, Config, ConfigBuilder, ConfigError};
pub use time::TimeBase;
pub use signals::{Pending, Signals};
pub use keypad::{ButtonEvent, ButtonInput, Column, IncrementButton, KeyEvent, KeyInput, KeypadMatrix, Row};
pub use laps::{LapRecord, LapStore, LAP_CAPACITY};
pub use machine::{Action, StepOutcome, Stopwatch, SystemState, Trigger};
pub use display::{Frame, FrontPanel, present, refresh};
pub use device::{Cycle, Device};
