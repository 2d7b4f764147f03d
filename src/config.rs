//! Device configuration and its builder.

/// Default time base period: one tick per 100 ms.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 100;

/// Default multiplexing dwell per digit.
pub const DEFAULT_DIGIT_HOLD_US: u32 = 1_000;

/// How often the alarm fires while the elapsed time sits inside the alarm second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmPolicy {
    /// Fire once when the elapsed time enters the alarm second.
    ///
    /// Re-arms once the elapsed time leaves that second or the stopwatch is reset.
    #[default]
    OncePerCrossing,

    /// Fire on every main-loop iteration while the condition holds.
    ///
    /// The blocking buzzer pattern bounds how often this repeats.
    WhileTrue,
}

/// Buzzer signal played when the alarm fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuzzerPattern {
    /// Number of output level toggles.
    pub toggles: u8,

    /// Delay after each toggle, in microseconds.
    pub interval_us: u32,
}

impl BuzzerPattern {
    /// Creates a new buzzer pattern.
    #[inline]
    pub const fn new(toggles: u8, interval_us: u32) -> Self {
        Self {
            toggles,
            interval_us,
        }
    }

    /// Total time the pattern blocks the main loop.
    pub const fn duration_us(&self) -> u64 {
        self.toggles as u64 * self.interval_us as u64
    }
}

impl Default for BuzzerPattern {
    fn default() -> Self {
        BuzzerPattern::new(6, 100_000)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period of zero milliseconds.
    ZeroTickPeriod,

    /// Debounce filter requiring zero samples.
    ZeroDebounceSamples,

    /// Buzzer pattern without any toggles.
    ZeroBuzzerToggles,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroTickPeriod => {
                write!(f, "tick period must be at least 1 ms")
            }
            ConfigError::ZeroDebounceSamples => {
                write!(f, "debounce filter needs at least one sample")
            }
            ConfigError::ZeroBuzzerToggles => {
                write!(f, "buzzer pattern needs at least one toggle")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Runtime parameters of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    tick_period_ms: u32,
    alarm_policy: AlarmPolicy,
    buzzer: BuzzerPattern,
    digit_hold_us: u32,
    debounce_samples: u8,
}

impl Config {
    /// Creates a builder starting from the default configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[inline]
    pub fn tick_period_ms(&self) -> u32 {
        self.tick_period_ms
    }

    #[inline]
    pub fn alarm_policy(&self) -> AlarmPolicy {
        self.alarm_policy
    }

    #[inline]
    pub fn buzzer(&self) -> BuzzerPattern {
        self.buzzer
    }

    #[inline]
    pub fn digit_hold_us(&self) -> u32 {
        self.digit_hold_us
    }

    /// Consecutive identical samples an input level needs before it is accepted.
    #[inline]
    pub fn debounce_samples(&self) -> u8 {
        self.debounce_samples
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            alarm_policy: AlarmPolicy::default(),
            buzzer: BuzzerPattern::default(),
            digit_hold_us: DEFAULT_DIGIT_HOLD_US,
            debounce_samples: 1,
        }
    }
}

/// Builder for [`Config`] with validation on `build()`.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder holding the default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn tick_period_ms(mut self, period_ms: u32) -> Self {
        self.config.tick_period_ms = period_ms;
        self
    }

    pub fn alarm_policy(mut self, policy: AlarmPolicy) -> Self {
        self.config.alarm_policy = policy;
        self
    }

    pub fn buzzer(mut self, pattern: BuzzerPattern) -> Self {
        self.config.buzzer = pattern;
        self
    }

    pub fn digit_hold_us(mut self, hold_us: u32) -> Self {
        self.config.digit_hold_us = hold_us;
        self
    }

    pub fn debounce_samples(mut self, samples: u8) -> Self {
        self.config.debounce_samples = samples;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    /// * `ZeroTickPeriod` - Tick period is zero
    /// * `ZeroDebounceSamples` - Debounce sample count is zero
    /// * `ZeroBuzzerToggles` - Buzzer pattern has no toggles
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = self.config;

        let result = if config.tick_period_ms == 0 {
            Err(ConfigError::ZeroTickPeriod)
        } else if config.debounce_samples == 0 {
            Err(ConfigError::ZeroDebounceSamples)
        } else if config.buzzer.toggles == 0 {
            Err(ConfigError::ZeroBuzzerToggles)
        } else {
            Ok(config)
        };

        if let Err(err) = result {
            warn!("config rejected: {}", err);
        }

        result
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
