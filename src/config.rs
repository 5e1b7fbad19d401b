//! Build-time light configuration
//!
//! Every device build picks one [`LightConfig`]. The presets mirror the
//! shipped hardware variants; other builds start from [`LightConfig::new`].

use core::fmt;

use embassy_time::Duration;

use crate::color::MiredRange;
use crate::topology::Topology;

/// Default resolution ceiling (10-bit PWM)
pub const DEFAULT_MAX_VALUE: u16 = 1024;

/// Default lowest brightness reachable by stepping down
pub const DEFAULT_MIN_BRIGHTNESS: u16 = 5;

/// Default number of steps between zero and full scale
pub const DEFAULT_STEPS: u16 = 16;

/// Default fade duration applied when a setter gets no explicit duration
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

/// Default period of the transition scheduler
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(10);

/// Static configuration of the light engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightConfig {
    /// Channel arrangement
    pub topology: Topology,
    /// Resolution ceiling of every numeric field and duty value
    pub max_value: u16,
    /// Floor used when stepping brightness down
    pub min_brightness: u16,
    /// Brightness increment of `increase_brightness`/`decrease_brightness`
    pub brightness_step: u16,
    /// Increment of color-mix and per-channel steps
    pub color_step: u16,
    /// Supported color temperature range
    pub color_temperature: MiredRange,
    /// Fade duration used when a setter gets `None`
    pub default_transition: Duration,
    /// Scheduler tick period
    pub tick_period: Duration,
}

/// Error returned by [`LightConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_value` is zero
    ZeroResolution,
    /// Mired range is empty or inverted
    EmptyMiredRange,
    /// `min_brightness` exceeds `max_value`
    MinBrightnessAboveMax,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroResolution => f.write_str("resolution must be non-zero"),
            Self::EmptyMiredRange => f.write_str("mired range is empty"),
            Self::MinBrightnessAboveMax => f.write_str("minimum brightness exceeds resolution"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl LightConfig {
    /// Bedside lamp: CCT strip, button dimmer, no radio
    pub const BEDSIDE_LAMP: Self = Self::new(Topology::Cct);

    /// Wi-Fi + 2.4 GHz remote controller driving a CCT strip
    pub const RGB_RF24_CONTROLLER: Self = Self::new(Topology::Cct);

    /// Create a configuration with default tuning for the given topology
    pub const fn new(topology: Topology) -> Self {
        Self {
            topology,
            max_value: DEFAULT_MAX_VALUE,
            min_brightness: DEFAULT_MIN_BRIGHTNESS,
            brightness_step: DEFAULT_MAX_VALUE / DEFAULT_STEPS,
            color_step: DEFAULT_MAX_VALUE / DEFAULT_STEPS,
            color_temperature: MiredRange::new(153, 370),
            default_transition: DEFAULT_TRANSITION,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    /// Set the resolution ceiling, rescaling both step sizes
    #[must_use]
    pub const fn with_max_value(mut self, max_value: u16) -> Self {
        self.max_value = max_value;
        self.brightness_step = max_value / DEFAULT_STEPS;
        self.color_step = max_value / DEFAULT_STEPS;
        self
    }

    #[must_use]
    pub const fn with_min_brightness(mut self, min_brightness: u16) -> Self {
        self.min_brightness = min_brightness;
        self
    }

    #[must_use]
    pub const fn with_steps(mut self, brightness_step: u16, color_step: u16) -> Self {
        self.brightness_step = brightness_step;
        self.color_step = color_step;
        self
    }

    #[must_use]
    pub const fn with_color_temperature(mut self, range: MiredRange) -> Self {
        self.color_temperature = range;
        self
    }

    #[must_use]
    pub const fn with_default_transition(mut self, duration: Duration) -> Self {
        self.default_transition = duration;
        self
    }

    #[must_use]
    pub const fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Check the configuration for values the engine cannot work with
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_value == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if self.color_temperature.min >= self.color_temperature.max {
            return Err(ConfigError::EmptyMiredRange);
        }
        if self.min_brightness > self.max_value {
            return Err(ConfigError::MinBrightnessAboveMax);
        }
        Ok(())
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::BEDSIDE_LAMP
    }
}
