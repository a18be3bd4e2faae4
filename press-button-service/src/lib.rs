//! Press Button Service
//!
//! Classifies the presses of a single button into [`PressEvent`]s: tiny, short,
//! double, long, super and constant (held). Edges are captured either by polling
//! the pin or by an interrupt-side producer writing into a shared [`EdgeCapture`];
//! all classification happens in [`Button::poll`].

#![no_std]
#![warn(missing_docs)]

#[macro_use]
mod fmt;

pub mod button;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod event;
pub mod level;
pub mod task;
pub mod time;

pub use button::Button;
pub use capture::{watch_edges, EdgeCapture, EdgeSample, EdgeSource, Interrupt, IsrCapture, Mode, Polled};
pub use classifier::{Classifier, Phase};
pub use config::ButtonConfig;
pub use event::{AnyHandler, EventHandler, Handlers, PressEvent};
pub use level::ActiveState;
pub use time::{Clock, SystemClock, Timestamp};

/// Reason a set of thresholds was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `tiny` must be below `short`
    TinyNotBelowShort,
    /// `short` must be below `long`
    ShortNotBelowLong,
    /// `long` must be below `super`
    LongNotBelowSuper,
    /// `short + double` must be below `long`
    DoubleWindowOverlapsLong,
    /// A threshold does not fit the 32-bit millisecond counter
    OutOfRange,
}

/// Press button service errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Thresholds violate the ordering invariant
    InvalidConfig(ConfigError),
}

/// override Result type for shorthand -> Result<T>
pub type Result<T> = core::result::Result<T, Error>;

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Error::InvalidConfig(error)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidConfig(ConfigError::TinyNotBelowShort) => f.write_str("tiny threshold must be below short"),
            Error::InvalidConfig(ConfigError::ShortNotBelowLong) => f.write_str("short threshold must be below long"),
            Error::InvalidConfig(ConfigError::LongNotBelowSuper) => f.write_str("long threshold must be below super"),
            Error::InvalidConfig(ConfigError::DoubleWindowOverlapsLong) => {
                f.write_str("short threshold plus double window must be below long")
            }
            Error::InvalidConfig(ConfigError::OutOfRange) => f.write_str("threshold exceeds the millisecond counter"),
        }
    }
}

impl core::error::Error for Error {}
