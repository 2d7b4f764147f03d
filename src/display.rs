//! Display presentation for the four-digit seven-segment panel.
//!
//! [`present`] maps the stopwatch state to a [`Frame`] (digit values, decimal
//! point, indicator LED) without touching hardware. [`refresh`] then drives a
//! [`FrontPanel`] through one multiplexing pass of that frame.

use crate::laps::LapRecord;
use crate::machine::{Stopwatch, SystemState};
use crate::types::{DigitPosition, Indicator, Ticks};
use embedded_hal::delay::DelayNs;

/// Segment patterns for digits 0-9. Active-low; bit 1 is the decimal point.
pub const SEGMENT_PATTERNS: [u8; 10] = [
    0b1000_0010, // 0
    0b1110_1110, // 1
    0b0000_0111, // 2
    0b0100_0110, // 3
    0b0110_1010, // 4
    0b0101_0010, // 5
    0b0001_0010, // 6
    0b1110_0110, // 7
    0b0000_0010, // 8
    0b0100_0010, // 9
];

/// Decimal point bit within a segment pattern (lit when cleared).
pub const DECIMAL_POINT: u8 = 0b0000_0010;

/// Ticks per displayed minute (600 tenths).
pub const TICKS_PER_MINUTE: Ticks = 600;

/// Trait for abstracting the front panel outputs.
///
/// Covers the multiplexed seven-segment display, the mode indicator LEDs,
/// the buzzer and the heartbeat LED. Handle any hardware errors internally -
/// these methods cannot fail.
pub trait FrontPanel {
    /// Puts a segment pattern on the shared segment lines.
    fn set_segments(&mut self, pattern: u8);

    /// Enables one digit's common line.
    fn select_digit(&mut self, position: DigitPosition);

    /// Disables every digit's common line.
    fn blank_digits(&mut self);

    /// Lights `indicator` and turns the other indicators off.
    fn select_indicator(&mut self, indicator: Indicator);

    /// Drives the buzzer output.
    fn set_buzzer(&mut self, on: bool);

    /// Drives the heartbeat LED.
    fn set_heartbeat(&mut self, on: bool);
}

/// Segment pattern for a single digit value (taken modulo 10).
#[inline]
pub fn segment_pattern(digit: u8) -> u8 {
    SEGMENT_PATTERNS[(digit % 10) as usize]
}

/// Splits a tick count into display digits, indexed by [`DigitPosition`].
///
/// Layout is `M S S t`: minutes, tens of seconds, seconds, tenths. Minutes
/// wrap after 9.
pub fn time_digits(ticks: Ticks) -> [u8; 4] {
    [
        (ticks % 10) as u8,
        ((ticks / 10) % 10) as u8,
        ((ticks % TICKS_PER_MINUTE) / 100) as u8,
        ((ticks / TICKS_PER_MINUTE) % 10) as u8,
    ]
}

/// Digits for lap review: lap ordinal on the left, lap seconds and tenths on the right.
///
/// Negative laps are shown by magnitude.
pub fn lap_digits(review_index: usize, lap: LapRecord) -> [u8; 4] {
    let mut digits = time_digits(lap.unsigned_abs());
    digits[DigitPosition::Thousands.index()] = ((review_index + 1) % 10) as u8;
    digits
}

/// What the display should show for one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    digits: [Option<u8>; 4],
    decimal_point: bool,
    indicator: Indicator,
}

impl Frame {
    /// Creates a frame. `digits` is indexed by [`DigitPosition`]; `None` leaves a digit dark.
    pub const fn new(digits: [Option<u8>; 4], decimal_point: bool, indicator: Indicator) -> Self {
        Self {
            digits,
            decimal_point,
            indicator,
        }
    }

    fn all(digits: [u8; 4], decimal_point: bool, indicator: Indicator) -> Self {
        Self::new(digits.map(Some), decimal_point, indicator)
    }

    /// Digit value at `position`, or `None` if dark.
    #[inline]
    pub fn digit(&self, position: DigitPosition) -> Option<u8> {
        self.digits[position.index()]
    }

    /// Whether the decimal point after [`DigitPosition::Tens`] is lit.
    #[inline]
    pub fn decimal_point(&self) -> bool {
        self.decimal_point
    }

    #[inline]
    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Segment pattern to drive at `position`, including the decimal point.
    pub fn pattern(&self, position: DigitPosition) -> Option<u8> {
        self.digit(position).map(|digit| {
            let pattern = segment_pattern(digit);
            if position == DigitPosition::Tens && self.decimal_point {
                pattern & !DECIMAL_POINT
            } else {
                pattern
            }
        })
    }
}

/// Computes the frame for the stopwatch's current state.
pub fn present(stopwatch: &Stopwatch) -> Frame {
    let state = stopwatch.state();
    let decimal_point = !matches!(state, SystemState::Idle | SystemState::Check);

    match state {
        SystemState::Idle => Frame::all([0; 4], decimal_point, Indicator::Idle),
        SystemState::AlarmSet => {
            let seconds = stopwatch.alarm_time().seconds();
            Frame::new(
                [None, Some(seconds % 10), Some(seconds / 10), None],
                decimal_point,
                Indicator::AlarmSet,
            )
        }
        SystemState::Counting => Frame::all(
            time_digits(stopwatch.elapsed()),
            decimal_point,
            Indicator::Counting,
        ),
        SystemState::Paused => Frame::all(
            time_digits(stopwatch.elapsed()),
            decimal_point,
            Indicator::Paused,
        ),
        SystemState::Check => {
            let laps = stopwatch.laps();
            Frame::all(
                lap_digits(laps.review_index(), laps.reviewed_lap()),
                decimal_point,
                Indicator::Paused,
            )
        }
    }
}

/// Drives one multiplexing pass of `frame`.
///
/// Selects the indicator, then for each lit digit from left to right writes
/// its pattern, blanks all digits, selects the digit and holds it for
/// `hold_us`.
pub fn refresh<P: FrontPanel, D: DelayNs>(frame: &Frame, panel: &mut P, delay: &mut D, hold_us: u32) {
    panel.select_indicator(frame.indicator());

    for position in DigitPosition::REFRESH_ORDER {
        if let Some(pattern) = frame.pattern(position) {
            panel.set_segments(pattern);
            panel.blank_digits();
            panel.select_digit(position);
            delay.delay_us(hold_us);
        }
    }
}
