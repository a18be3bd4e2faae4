//! Edge capture
//!
//! The only state shared between the edge producer and the classifier is a single
//! [`EdgeCapture`] slot holding the latest level and the time it changed. Producers do
//! nothing but read the pin, read the clock and store; every decision is made later by
//! the classifier inside [`Button::poll`](crate::Button::poll).
//!
//! An `EdgeCapture` is `const`-constructible so it can live in a `static`, one per
//! monitored input line, where a parameterless interrupt handler can reach it.
//!
//! Only the latest sample is kept. If the line changes twice between polls the
//! intermediate level is lost.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_time::Timer;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::level::ActiveState;
use crate::time::{Clock, Timestamp};

/// A logical level and the time it was first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeSample {
    /// `true` while the button is pressed.
    pub pressed: bool,
    /// When the line changed to `pressed`.
    pub at: Timestamp,
}

/// Single-writer, single-reader slot for the latest [`EdgeSample`].
///
/// Both fields are plain atomic loads and stores, so recording never blocks and is
/// safe from interrupt context. A read racing a write can pair the old level with the
/// new timestamp; the classifier only acts on level changes, so that costs at most a
/// timestamp that is one edge too new.
#[derive(Debug)]
pub struct EdgeCapture {
    pressed: AtomicBool,
    at: AtomicU32,
}

impl EdgeCapture {
    /// Creates a released slot stamped at time zero.
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
            at: AtomicU32::new(0),
        }
    }

    /// Stores a sample unconditionally.
    pub fn record(&self, pressed: bool, at: Timestamp) {
        self.at.store(at.as_millis(), Ordering::Relaxed);
        self.pressed.store(pressed, Ordering::Release);
    }

    /// Stores a sample only if `pressed` differs from the stored level, so the stored
    /// timestamp stays the time of the change. Returns whether the sample was stored.
    pub fn update(&self, pressed: bool, at: Timestamp) -> bool {
        if self.pressed.load(Ordering::Relaxed) == pressed {
            return false;
        }
        self.record(pressed, at);
        true
    }

    /// Latest sample.
    pub fn load(&self) -> EdgeSample {
        let pressed = self.pressed.load(Ordering::Acquire);
        let at = Timestamp::from_millis(self.at.load(Ordering::Relaxed));
        EdgeSample { pressed, at }
    }
}

impl Default for EdgeCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// How edges reach the [`EdgeCapture`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// The pin is read synchronously at every poll.
    Poll,
    /// An asynchronous producer records edges; polls only consume them.
    Interrupt,
}

/// Poll-time half of edge capture, run at the start of every poll.
pub trait EdgeSource {
    /// Capture mode implemented by this source.
    const MODE: Mode;

    /// Refreshes `capture` if this source samples synchronously.
    fn sample(&mut self, capture: &EdgeCapture, now: Timestamp);
}

/// Reads the pin on every poll. Latency is bounded by the poll interval.
#[derive(Debug)]
pub struct Polled<I> {
    gpio: I,
    active_state: ActiveState,
}

impl<I: InputPin> Polled<I> {
    /// Creates a polled source for the given pin.
    pub fn new(gpio: I, active_state: ActiveState) -> Self {
        Self { gpio, active_state }
    }

    /// Releases the pin.
    pub fn into_inner(self) -> I {
        self.gpio
    }
}

impl<I: InputPin> EdgeSource for Polled<I> {
    const MODE: Mode = Mode::Poll;

    fn sample(&mut self, capture: &EdgeCapture, now: Timestamp) {
        capture_level(&mut self.gpio, self.active_state, capture, now);
    }
}

/// Edges are recorded elsewhere, by [`IsrCapture`] or [`watch_edges`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Interrupt;

impl EdgeSource for Interrupt {
    const MODE: Mode = Mode::Interrupt;

    fn sample(&mut self, _capture: &EdgeCapture, _now: Timestamp) {}
}

/// Everything an edge interrupt handler needs, bundled so the handler takes no arguments
/// beyond a reference to this.
///
/// Typically stored in a `critical_section::Mutex<RefCell<Option<IsrCapture<..>>>>` next
/// to the `static` [`EdgeCapture`] it writes to.
#[derive(Debug)]
pub struct IsrCapture<'a, I, C> {
    gpio: I,
    active_state: ActiveState,
    clock: C,
    capture: &'a EdgeCapture,
}

impl<'a, I: InputPin, C: Clock> IsrCapture<'a, I, C> {
    /// Binds a pin and clock to a capture slot.
    pub fn new(gpio: I, active_state: ActiveState, clock: C, capture: &'a EdgeCapture) -> Self {
        Self {
            gpio,
            active_state,
            clock,
            capture,
        }
    }

    /// Call from the pin change interrupt, on both edges.
    pub fn on_edge(&mut self) {
        let now = self.clock.now();
        if capture_level(&mut self.gpio, self.active_state, self.capture, now) {
            trace!("Edge captured at {}", now.as_millis());
        }
    }
}

/// Records edges on `gpio` into `capture` forever.
///
/// The embassy rendition of interrupt mode: the GPIO interrupt wakes this task, which
/// does the same minimal work as [`IsrCapture::on_edge`].
pub async fn watch_edges<I: InputPin + Wait, C: Clock>(
    mut gpio: I,
    active_state: ActiveState,
    clock: C,
    capture: &EdgeCapture,
) -> ! {
    // Pick up the level the line is already at
    capture_level(&mut gpio, active_state, capture, clock.now());

    loop {
        match gpio.wait_for_any_edge().await {
            Ok(()) => {
                let now = clock.now();
                if capture_level(&mut gpio, active_state, capture, now) {
                    trace!("Edge captured at {}", now.as_millis());
                }
            }
            Err(_) => {
                warn!("Waiting for button edge failed");
                Timer::after_millis(1).await;
            }
        }
    }
}

fn capture_level<I: InputPin>(gpio: &mut I, active_state: ActiveState, capture: &EdgeCapture, now: Timestamp) -> bool {
    match active_state.is_pressed(gpio) {
        Ok(pressed) => capture.update(pressed, now),
        Err(_) => {
            trace!("Button pin read failed");
            false
        }
    }
}
