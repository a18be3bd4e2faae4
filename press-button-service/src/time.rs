//! Millisecond timestamps on a wrapping 32-bit counter

use embassy_time::Instant;

/// A reading of a monotonic millisecond counter that wraps at `u32::MAX`.
///
/// Timestamps carry no ordering of their own: after a wrap, a later reading can be
/// numerically smaller than an earlier one. Elapsed time is only ever computed with
/// [`Timestamp::millis_since`], which subtracts modulo 2^32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(u32);

impl Timestamp {
    /// Creates a timestamp from a raw counter value.
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    /// Raw counter value.
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    ///
    /// Correct across a single counter wrap as long as the real interval is shorter
    /// than 2^32 ms.
    pub const fn millis_since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Like [`Timestamp::millis_since`], but 0 when `earlier` is actually ahead of `self`.
    ///
    /// An edge stamped by an interrupt after the poll read the clock is up to a few ms
    /// "in the future"; the wrapped difference then lands in the upper half of the
    /// counter range. Intervals of 2^31 ms or more are treated the same way.
    pub const fn elapsed_since(self, earlier: Timestamp) -> u32 {
        let elapsed = self.millis_since(earlier);
        if elapsed > i32::MAX as u32 {
            0
        } else {
            elapsed
        }
    }
}

/// A monotonic millisecond clock source.
pub trait Clock {
    /// Current counter value.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Clock backed by the embassy time driver.
///
/// The 64-bit uptime is truncated to 32 bits, which is exactly the wrapping counter
/// the classifier expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(Instant::now().as_millis() as u32)
    }
}
