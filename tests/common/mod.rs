//! Shared test infrastructure for keypad-stopwatch integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use embedded_hal::delay::DelayNs;
use keypad_stopwatch::keypad::key_at;
use keypad_stopwatch::{
    Column, DigitPosition, FrontPanel, IncrementButton, Indicator, KeyCode, KeypadMatrix, Row,
};

// ============================================================================
// Mock Keypad
// ============================================================================

/// Mock keypad matrix reporting whichever keys the test marks as held
pub struct MockMatrix<'a> {
    held: &'a Cell<[bool; 10]>,
    driven: Option<Column>,
    scans: u32,
}

impl<'a> MockMatrix<'a> {
    pub fn new(held: &'a Cell<[bool; 10]>) -> Self {
        Self {
            held,
            driven: None,
            scans: 0,
        }
    }

    /// Number of column drives performed
    pub fn scans(&self) -> u32 {
        self.scans
    }
}

impl KeypadMatrix for MockMatrix<'_> {
    fn drive_column(&mut self, column: Column) {
        self.driven = Some(column);
        self.scans += 1;
    }

    fn row_active(&mut self, row: Row) -> bool {
        match self.driven {
            Some(column) => self.held.get()[key_at(column, row).id() as usize],
            None => false,
        }
    }
}

/// Test-side handle for pressing keys on a `MockMatrix`
pub struct Keys {
    held: Cell<[bool; 10]>,
}

impl Keys {
    pub fn new() -> Self {
        Self {
            held: Cell::new([false; 10]),
        }
    }

    pub fn matrix(&self) -> MockMatrix<'_> {
        MockMatrix::new(&self.held)
    }

    pub fn hold(&self, key: KeyCode) {
        let mut held = self.held.get();
        held[key.id() as usize] = true;
        self.held.set(held);
    }

    pub fn release(&self, key: KeyCode) {
        let mut held = self.held.get();
        held[key.id() as usize] = false;
        self.held.set(held);
    }

    pub fn release_all(&self) {
        self.held.set([false; 10]);
    }
}

// ============================================================================
// Mock Button
// ============================================================================

/// Mock increment button backed by a shared flag
pub struct MockButton<'a> {
    pressed: &'a Cell<bool>,
}

impl<'a> MockButton<'a> {
    pub fn new(pressed: &'a Cell<bool>) -> Self {
        Self { pressed }
    }
}

impl IncrementButton for MockButton<'_> {
    fn is_pressed(&mut self) -> bool {
        self.pressed.get()
    }
}

// ============================================================================
// Mock Front Panel
// ============================================================================

/// Mock front panel that records what was driven
pub struct MockPanel {
    /// Last pattern shown on each digit position (cleared by `clear_digits`)
    pub digits: [Option<u8>; 4],
    pub indicator: Option<Indicator>,
    pub buzzer: bool,
    pub buzzer_history: heapless::Vec<bool, 32>,
    pub heartbeat: bool,
    pub heartbeat_toggles: u32,
    pub blank_count: u32,
    pending_pattern: u8,
}

impl MockPanel {
    pub fn new() -> Self {
        Self {
            digits: [None; 4],
            indicator: None,
            buzzer: false,
            buzzer_history: heapless::Vec::new(),
            heartbeat: false,
            heartbeat_toggles: 0,
            blank_count: 0,
            pending_pattern: 0xFF,
        }
    }

    pub fn digit(&self, position: DigitPosition) -> Option<u8> {
        self.digits[position.index()]
    }

    pub fn clear_digits(&mut self) {
        self.digits = [None; 4];
    }
}

impl FrontPanel for MockPanel {
    fn set_segments(&mut self, pattern: u8) {
        self.pending_pattern = pattern;
    }

    fn select_digit(&mut self, position: DigitPosition) {
        self.digits[position.index()] = Some(self.pending_pattern);
    }

    fn blank_digits(&mut self) {
        self.blank_count += 1;
    }

    fn select_indicator(&mut self, indicator: Indicator) {
        self.indicator = Some(indicator);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer = on;
        let _ = self.buzzer_history.push(on);
    }

    fn set_heartbeat(&mut self, on: bool) {
        if on != self.heartbeat {
            self.heartbeat_toggles += 1;
        }
        self.heartbeat = on;
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Mock delay that only accumulates the requested time
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self { total_ns: 0 }
    }

    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
