//! Keypad and push-button input: matrix scanning, debouncing and edge detection.
//!
//! Scanning returns a level (which key is down right now). [`KeyInput`] and
//! [`ButtonInput`] turn those levels into press/release events so that each
//! physical press produces exactly one action, taken on release.

use crate::types::KeyCode;

/// Keypad column drive lines, in scan priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Column {
    /// Keys 1, 4, 7.
    First,
    /// Keys 2, 5, 8.
    Second,
    /// Keys 3, 6, 9.
    Third,
}

impl Column {
    pub const SCAN_ORDER: [Column; 3] = [Column::First, Column::Second, Column::Third];

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Keypad row sense lines, in test order within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    First,
    Second,
    Third,
}

impl Row {
    pub const SCAN_ORDER: [Row; 3] = [Row::First, Row::Second, Row::Third];

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Key number at a matrix crossing (`1..=9`, row-major).
pub const fn key_at(column: Column, row: Row) -> KeyCode {
    match KeyCode::new(row.index() * 3 + column.index() + 1) {
        Some(code) => code,
        None => KeyCode::NONE,
    }
}

/// Trait for abstracting the 3×3 keypad matrix hardware.
///
/// Implementations drive the selected column active and the others inactive,
/// and report whether a row line senses a closed key on the driven column.
/// Handle any GPIO errors internally - these methods cannot fail.
pub trait KeypadMatrix {
    /// Drives `column` active and the other columns inactive.
    fn drive_column(&mut self, column: Column);

    /// Returns true if `row` senses a pressed key on the driven column.
    fn row_active(&mut self, row: Row) -> bool;
}

/// Trait for the alarm-increment push button.
///
/// Implementations translate the electrical level (active-low on the
/// reference board) into a pressed flag.
pub trait IncrementButton {
    /// Returns true while the button is held down.
    fn is_pressed(&mut self) -> bool;
}

/// Scans the keypad once and returns the first pressed key, or
/// [`KeyCode::NONE`].
///
/// Columns are tested in order first, second, third; within a column the rows
/// are tested top to bottom. The first closed crossing wins.
pub fn scan<M: KeypadMatrix>(matrix: &mut M) -> KeyCode {
    for column in Column::SCAN_ORDER {
        matrix.drive_column(column);

        for row in Row::SCAN_ORDER {
            if matrix.row_active(row) {
                return key_at(column, row);
            }
        }
    }

    KeyCode::NONE
}

/// Accepts a new input level only after it was sampled a number of times in a row.
///
/// With a sample requirement of 1 every sample is accepted immediately, which
/// is right for inputs that are already debounced in hardware.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer<T> {
    stable: T,
    candidate: T,
    count: u8,
    required: u8,
}

impl<T: Copy + PartialEq> Debouncer<T> {
    /// Creates a debouncer starting at `initial`.
    ///
    /// A `required` of 0 is treated as 1.
    pub fn new(initial: T, required: u8) -> Self {
        Self {
            stable: initial,
            candidate: initial,
            count: 0,
            required: required.max(1),
        }
    }

    /// Feeds one raw sample and returns the debounced level.
    pub fn update(&mut self, sample: T) -> T {
        if sample == self.stable {
            self.candidate = sample;
            self.count = 0;
            return self.stable;
        }

        if sample == self.candidate {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = sample;
            self.count = 1;
        }

        if self.count >= self.required {
            self.stable = sample;
            self.count = 0;
        }

        self.stable
    }

    /// Last accepted level.
    #[inline]
    pub fn stable(&self) -> T {
        self.stable
    }
}

/// A change in keypad state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// A key went down.
    Pressed(KeyCode),
    /// The held key went up (or another key replaced it).
    Released(KeyCode),
}

/// Debounced keypad with press/release edge detection.
#[derive(Debug, Clone, Copy)]
pub struct KeyInput {
    debouncer: Debouncer<KeyCode>,
    held: KeyCode,
}

impl KeyInput {
    /// Creates a keypad input with nothing held.
    ///
    /// # Arguments
    /// * `debounce_samples` - Consecutive identical scans needed to accept a change
    pub fn new(debounce_samples: u8) -> Self {
        Self {
            debouncer: Debouncer::new(KeyCode::NONE, debounce_samples),
            held: KeyCode::NONE,
        }
    }

    /// Scans the matrix and reports at most one edge.
    pub fn poll<M: KeypadMatrix>(&mut self, matrix: &mut M) -> Option<KeyEvent> {
        let code = self.debouncer.update(scan(matrix));
        self.update(code)
    }

    /// Feeds an already scanned key code and reports at most one edge.
    ///
    /// A direct change from one key to another yields `Released` for the old
    /// key now and `Pressed` for the new key on the next call.
    pub fn update(&mut self, code: KeyCode) -> Option<KeyEvent> {
        if code == self.held {
            return None;
        }

        if !self.held.is_none() {
            let released = self.held;
            self.held = KeyCode::NONE;
            return Some(KeyEvent::Released(released));
        }

        self.held = code;
        Some(KeyEvent::Pressed(code))
    }

    /// Key currently held down, or [`KeyCode::NONE`].
    #[inline]
    pub fn held(&self) -> KeyCode {
        self.held
    }
}

/// A change in push-button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Pressed,
    Released,
}

/// Debounced push button with press/release edge detection.
#[derive(Debug, Clone, Copy)]
pub struct ButtonInput {
    debouncer: Debouncer<bool>,
    held: bool,
}

impl ButtonInput {
    pub fn new(debounce_samples: u8) -> Self {
        Self {
            debouncer: Debouncer::new(false, debounce_samples),
            held: false,
        }
    }

    /// Samples the button and reports at most one edge.
    pub fn poll<B: IncrementButton>(&mut self, button: &mut B) -> Option<ButtonEvent> {
        let pressed = self.debouncer.update(button.is_pressed());

        match (self.held, pressed) {
            (false, true) => {
                self.held = true;
                Some(ButtonEvent::Pressed)
            }
            (true, false) => {
                self.held = false;
                Some(ButtonEvent::Released)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.held
    }
}
