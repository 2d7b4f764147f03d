//! Core value types shared by the input, state machine and display layers.

/// Elapsed time in ticks of the time base (one tick = `Config::tick_period_ms`).
pub type Ticks = u32;

/// Number of seconds the alarm threshold can take (`0..=59`).
pub const ALARM_MODULUS: u8 = 60;

/// A logical keypad key.
///
/// `0` means no key; `1..=9` identify keys of the 3×3 matrix, numbered row by
/// row (`1 2 3` / `4 5 6` / `7 8 9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(u8);

impl KeyCode {
    /// No key pressed.
    pub const NONE: Self = KeyCode(0);

    /// Toggles between counting and paused from any state.
    pub const START_PAUSE: Self = KeyCode(1);

    /// Enters and leaves alarm editing.
    pub const ALARM: Self = KeyCode(3);

    /// Enters and leaves lap review.
    pub const REVIEW: Self = KeyCode(5);

    /// Records a lap while counting, resets while paused.
    pub const LAP_RESET: Self = KeyCode(9);

    /// Creates a key code, returning `None` outside `0..=9`.
    pub const fn new(id: u8) -> Option<Self> {
        if id <= 9 { Some(KeyCode(id)) } else { None }
    }

    /// Returns the raw key number.
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Returns true if this is [`KeyCode::NONE`].
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<KeyCode> for u8 {
    fn from(code: KeyCode) -> Self {
        code.0
    }
}

/// Alarm threshold in whole seconds, always within `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime(u8);

impl AlarmTime {
    /// Creates an alarm time, returning `None` for values of 60 or more.
    pub const fn new(seconds: u8) -> Option<Self> {
        if seconds < ALARM_MODULUS {
            Some(AlarmTime(seconds))
        } else {
            None
        }
    }

    /// Returns the alarm one second later, wrapping 59 back to 0.
    #[inline]
    pub const fn incremented(self) -> Self {
        AlarmTime((self.0 + 1) % ALARM_MODULUS)
    }

    #[inline]
    pub const fn seconds(self) -> u8 {
        self.0
    }

    /// True when `elapsed` ticks fall inside the alarm's second.
    ///
    /// Ticks are tenths, so the comparison is `elapsed / 10 == seconds`.
    #[inline]
    pub const fn matches(self, elapsed: Ticks) -> bool {
        elapsed / 10 == self.0 as Ticks
    }
}

/// One of the four multiplexed digits, numbered right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitPosition {
    /// Rightmost digit (tenths while timing).
    Units = 0,
    /// Carries the decimal point (seconds while timing).
    Tens = 1,
    /// Tens of seconds while timing.
    Hundreds = 2,
    /// Leftmost digit (minutes while timing, lap ordinal in review).
    Thousands = 3,
}

impl DigitPosition {
    /// Refresh order: leftmost digit first.
    pub const REFRESH_ORDER: [DigitPosition; 4] = [
        DigitPosition::Thousands,
        DigitPosition::Hundreds,
        DigitPosition::Tens,
        DigitPosition::Units,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Mode indicator LEDs on the front panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// LED5.
    Idle,
    /// LED6.
    Counting,
    /// LED7, also shown during lap review.
    Paused,
    /// LED8.
    AlarmSet,
}

impl Indicator {
    /// Returns the board LED number (5..=8).
    pub const fn led_number(self) -> u8 {
        match self {
            Indicator::Idle => 5,
            Indicator::Counting => 6,
            Indicator::Paused => 7,
            Indicator::AlarmSet => 8,
        }
    }
}
