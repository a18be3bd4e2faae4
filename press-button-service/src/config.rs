//! Press-length thresholds

use embassy_time::Duration;

use crate::{ConfigError, Error, Result};

/// Default tiny press threshold in milliseconds.
pub const DEFAULT_TINY_MS: u32 = 10;
/// Default short press threshold in milliseconds.
pub const DEFAULT_SHORT_MS: u32 = 50;
/// Default double press window in milliseconds.
pub const DEFAULT_DOUBLE_MS: u32 = 250;
/// Default long press threshold in milliseconds.
pub const DEFAULT_LONG_MS: u32 = 500;
/// Default super press threshold in milliseconds.
pub const DEFAULT_SUPER_MS: u32 = 1500;

/// Thresholds used to bucket a press into a [`PressEvent`](crate::PressEvent).
///
/// A press lasting `d` milliseconds is classified as:
///
/// | Range                     | Result                                   |
/// |---------------------------|------------------------------------------|
/// | `d < tiny`                | nothing                                  |
/// | `tiny <= d < short`       | `Tiny`                                   |
/// | `short <= d < long`       | `Short`, or `Double` with a second press |
/// | `long <= d < super`       | `Long`                                   |
/// | `super <= d`              | `Super`                                  |
///
/// Holding past `super` without releasing additionally reports `Constant` once.
///
/// Only validated values can be constructed, so a `ButtonConfig` always satisfies
/// `tiny < short < long < super` and `short + double < long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    tiny_ms: u32,
    short_ms: u32,
    double_ms: u32,
    long_ms: u32,
    super_ms: u32,
    release_after_constant: bool,
}

impl ButtonConfig {
    /// Creates a validated configuration from durations.
    pub fn new(tiny: Duration, short: Duration, double: Duration, long: Duration, super_: Duration) -> Result<Self> {
        Self::from_millis(
            to_millis(tiny)?,
            to_millis(short)?,
            to_millis(double)?,
            to_millis(long)?,
            to_millis(super_)?,
        )
    }

    /// Creates a validated configuration from millisecond values.
    pub fn from_millis(tiny_ms: u32, short_ms: u32, double_ms: u32, long_ms: u32, super_ms: u32) -> Result<Self> {
        let rule = if tiny_ms >= short_ms {
            Some(ConfigError::TinyNotBelowShort)
        } else if short_ms >= long_ms {
            Some(ConfigError::ShortNotBelowLong)
        } else if long_ms >= super_ms {
            Some(ConfigError::LongNotBelowSuper)
        } else if short_ms.checked_add(double_ms).map_or(true, |end| end >= long_ms) {
            Some(ConfigError::DoubleWindowOverlapsLong)
        } else {
            None
        };

        if let Some(rule) = rule {
            warn!("Rejected button thresholds: {:?}", rule);
            return Err(Error::InvalidConfig(rule));
        }

        Ok(Self {
            tiny_ms,
            short_ms,
            double_ms,
            long_ms,
            super_ms,
            release_after_constant: false,
        })
    }

    /// Unwraps a configuration result, falling back to the defaults if it was rejected.
    pub fn or_default(result: Result<Self>) -> Self {
        result.unwrap_or_default()
    }

    /// Whether releasing a hold that already reported `Constant` still reports its
    /// `Long` or `Super` classification. Off by default.
    pub fn with_release_after_constant(mut self, enabled: bool) -> Self {
        self.release_after_constant = enabled;
        self
    }

    /// Presses shorter than this are ignored.
    pub fn tiny_ms(&self) -> u32 {
        self.tiny_ms
    }

    /// Start of the short press range.
    pub fn short_ms(&self) -> u32 {
        self.short_ms
    }

    /// Maximum time between two short releases that still counts as a double press.
    pub fn double_ms(&self) -> u32 {
        self.double_ms
    }

    /// Start of the long press range.
    pub fn long_ms(&self) -> u32 {
        self.long_ms
    }

    /// Start of the super press range, and the hold time after which `Constant` fires.
    pub fn super_ms(&self) -> u32 {
        self.super_ms
    }

    /// See [`ButtonConfig::with_release_after_constant`].
    pub fn release_after_constant(&self) -> bool {
        self.release_after_constant
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            tiny_ms: DEFAULT_TINY_MS,
            short_ms: DEFAULT_SHORT_MS,
            double_ms: DEFAULT_DOUBLE_MS,
            long_ms: DEFAULT_LONG_MS,
            super_ms: DEFAULT_SUPER_MS,
            release_after_constant: false,
        }
    }
}

fn to_millis(duration: Duration) -> Result<u32> {
    u32::try_from(duration.as_millis()).map_err(|_| Error::InvalidConfig(ConfigError::OutOfRange))
}
