#![no_std]
#![no_main]

use cortex_m_rt::entry;
use embedded_hal::delay::DelayNs;
use keypad_stopwatch::{
    Column, Config, Device, DigitPosition, FrontPanel, IncrementButton, Indicator, KeypadMatrix,
    Row, Signals,
};
use panic_halt as _;

static SIGNALS: Signals = Signals::new();

// ============================================================================
// Minimal Hardware
// ============================================================================

/// Keypad with nothing pressed
pub struct MinimalKeypad;

impl KeypadMatrix for MinimalKeypad {
    fn drive_column(&mut self, column: Column) {
        core::hint::black_box(column);
    }

    fn row_active(&mut self, row: Row) -> bool {
        core::hint::black_box(row);
        false
    }
}

/// Button that is never pressed
pub struct MinimalButton;

impl IncrementButton for MinimalButton {
    fn is_pressed(&mut self) -> bool {
        core::hint::black_box(false)
    }
}

/// Panel that discards every output
pub struct MinimalPanel;

impl FrontPanel for MinimalPanel {
    fn set_segments(&mut self, pattern: u8) {
        core::hint::black_box(pattern);
    }

    fn select_digit(&mut self, position: DigitPosition) {
        core::hint::black_box(position);
    }

    fn blank_digits(&mut self) {}

    fn select_indicator(&mut self, indicator: Indicator) {
        core::hint::black_box(indicator);
    }

    fn set_buzzer(&mut self, on: bool) {
        core::hint::black_box(on);
    }

    fn set_heartbeat(&mut self, on: bool) {
        core::hint::black_box(on);
    }
}

/// Busy-wait delay assuming an 8 MHz core clock
pub struct MinimalDelay;

impl DelayNs for MinimalDelay {
    fn delay_ns(&mut self, ns: u32) {
        cortex_m::asm::delay(ns / 125);
    }
}

// ============================================================================
// Device
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn exercise_device() {
    let mut device = Device::new(
        Config::default(),
        MinimalKeypad,
        MinimalButton,
        MinimalPanel,
        MinimalDelay,
        &SIGNALS,
    );

    SIGNALS.tick();
    SIGNALS.lap_advance();
    let cycle = device.run_once();
    core::hint::black_box(cycle);
    core::hint::black_box(device.stopwatch().elapsed());
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    exercise_device();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
