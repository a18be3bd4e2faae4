//! Button Service Definitions

use crate::capture::{EdgeCapture, EdgeSource, Mode};
use crate::classifier::{Classifier, Phase};
use crate::config::ButtonConfig;
use crate::event::{Handlers, PressEvent};
use crate::time::Clock;

/// A single monitored button: an edge source, a clock, the shared capture slot, the
/// classifier and its handlers.
///
/// The configuration is fixed at construction. Build it with
/// [`ButtonConfig::new`] and fall back to [`ButtonConfig::default`] if it is rejected.
#[derive(Debug)]
pub struct Button<'a, S, C> {
    source: S,
    clock: C,
    capture: &'a EdgeCapture,
    classifier: Classifier,
    handlers: Handlers,
}

impl<'a, S: EdgeSource, C: Clock> Button<'a, S, C> {
    /// Creates a new `Button` reading edges from `capture`.
    pub fn new(source: S, clock: C, capture: &'a EdgeCapture, config: ButtonConfig) -> Self {
        debug!("Button created in {:?} mode", S::MODE);
        Self {
            source,
            clock,
            capture,
            classifier: Classifier::new(config),
            handlers: Handlers::new(),
        }
    }

    /// Returns the button configuration.
    pub fn config(&self) -> &ButtonConfig {
        self.classifier.config()
    }

    /// How edges are captured.
    pub fn mode(&self) -> Mode {
        S::MODE
    }

    /// Handlers invoked from [`Button::poll`].
    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    /// Whether the button was pressed as of the last poll.
    pub fn is_pressed(&self) -> bool {
        self.classifier.is_pressed()
    }

    /// Logical state as of the last poll.
    pub fn phase(&self) -> Phase {
        self.classifier.phase()
    }

    /// Samples the input (in poll mode), advances the classifier and runs the handlers
    /// for the resulting event, if any.
    ///
    /// Never blocks. In poll mode, call at least as often as the tiny threshold.
    pub fn poll(&mut self) -> Option<PressEvent> {
        self.source.sample(self.capture, self.clock.now());
        let sample = self.capture.load();
        // Read after the load so an edge recorded before it is never newer than `now`
        let now = self.clock.now();

        let event = self.classifier.update(sample, now)?;
        debug!("Button event {:?} at {}", event, now.as_millis());
        self.handlers.dispatch(event);
        Some(event)
    }

    /// Releases the edge source and clock.
    pub fn release(self) -> (S, C) {
        (self.source, self.clock)
    }
}

#[cfg(test)]
mod test {
    extern crate std;

    use core::cell::Cell;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::format;
    use std::vec::Vec;

    use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};

    use super::*;
    use crate::capture::{Interrupt, Polled};
    use crate::level::ActiveState;
    use crate::time::Timestamp;

    #[derive(Debug)]
    struct TestClock(Cell<u32>);

    impl TestClock {
        fn new(start: u32) -> Self {
            Self(Cell::new(start))
        }

        fn set(&self, millis: u32) {
            self.0.set(millis);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0.get())
        }
    }

    /// Polls every 5 ms through `[from, to)` and collects events.
    fn run<S: EdgeSource>(button: &mut Button<'_, S, &TestClock>, clock: &TestClock, from: u32, to: u32) -> Vec<PressEvent> {
        (from..to)
            .step_by(5)
            .filter_map(|now| {
                clock.set(now);
                button.poll()
            })
            .collect()
    }

    /// Pin readings for a polled pin: `(level, polls)` pairs.
    fn readings(levels: &[(State, usize)]) -> Vec<Transaction> {
        levels
            .iter()
            .flat_map(|(state, polls)| (0..*polls).map(move |_| Transaction::get(state.clone())))
            .collect()
    }

    #[test]
    fn polled_double_then_long_then_constant() {
        let clock = TestClock::new(0);
        let capture = EdgeCapture::new();
        // 5 ms polls: 100 ms press, 100 ms gap, 100 ms press, idle, 600 ms press, idle,
        // 2000 ms hold, idle
        let pin = Mock::new(&readings(&[
            (State::High, 20),
            (State::Low, 20),
            (State::High, 20),
            (State::Low, 20),
            (State::High, 120),
            (State::Low, 120),
            (State::High, 100),
            (State::Low, 400),
            (State::High, 100),
        ]));
        let mut handle = pin.clone();
        let mut button = Button::new(
            Polled::new(pin, ActiveState::ActiveLow),
            &clock,
            &capture,
            ButtonConfig::default(),
        );
        assert_eq!(button.mode(), Mode::Poll);

        let events = run(&mut button, &clock, 0, 4_600);
        assert_eq!(
            events,
            [PressEvent::Double, PressEvent::Long, PressEvent::Constant]
        );
        assert!(!button.is_pressed());
        handle.done();
    }

    #[test]
    fn interrupt_mode_consumes_captured_edges() {
        let clock = TestClock::new(10_000);
        let capture = EdgeCapture::new();
        let mut button = Button::new(Interrupt, &clock, &capture, ButtonConfig::default());
        assert_eq!(button.mode(), Mode::Interrupt);

        // Edges land between polls, stamped by the producer
        capture.update(true, Timestamp::from_millis(10_003));
        clock.set(10_050);
        assert_eq!(button.poll(), None);
        assert!(button.is_pressed());

        capture.update(false, Timestamp::from_millis(10_100));
        clock.set(10_200);
        assert_eq!(button.poll(), None);
        assert_eq!(button.phase(), Phase::ShortPending);

        clock.set(10_351);
        assert_eq!(button.poll(), Some(PressEvent::Short));
        assert_eq!(button.poll(), None);
    }

    #[test]
    fn interrupt_mode_loses_coalesced_edges() {
        let clock = TestClock::new(0);
        let capture = EdgeCapture::new();
        let mut button = Button::new(Interrupt, &clock, &capture, ButtonConfig::default());

        // Press and release between two polls: only the final released level is seen
        capture.update(true, Timestamp::from_millis(100));
        capture.update(false, Timestamp::from_millis(700));
        clock.set(800);
        assert_eq!(button.poll(), None);
        assert_eq!(button.phase(), Phase::Idle);
    }

    /// Records the wanted level 1 ms after the poll's clock read, like an edge interrupt
    /// landing right after it.
    struct LateInterrupt {
        pressed: bool,
    }

    impl EdgeSource for LateInterrupt {
        const MODE: Mode = Mode::Interrupt;

        fn sample(&mut self, capture: &EdgeCapture, now: Timestamp) {
            capture.update(self.pressed, Timestamp::from_millis(now.as_millis().wrapping_add(1)));
        }
    }

    #[test]
    fn edge_recorded_after_clock_read_is_not_misclassified() {
        let clock = TestClock::new(1_000);
        let capture = EdgeCapture::new();
        let mut button = Button::new(LateInterrupt { pressed: true }, &clock, &capture, ButtonConfig::default());

        // Press edge must not look like a hold of ~u32::MAX ms
        assert_eq!(button.poll(), None);
        assert!(button.is_pressed());

        // Short release must wait out the double window
        clock.set(1_100);
        button.source.pressed = false;
        assert_eq!(button.poll(), None);
        assert_eq!(button.phase(), Phase::ShortPending);

        clock.set(1_351);
        assert_eq!(button.poll(), None);
        clock.set(1_352);
        assert_eq!(button.poll(), Some(PressEvent::Short));
    }

    #[test]
    fn edge_recorded_after_clock_read_still_completes_double() {
        let clock = TestClock::new(u32::MAX - 100);
        let capture = EdgeCapture::new();
        let mut button = Button::new(LateInterrupt { pressed: true }, &clock, &capture, ButtonConfig::default());

        let mut events = Vec::new();
        for (now, pressed) in [(u32::MAX - 100, true), (0, false), (100, true), (200, false)] {
            clock.set(now);
            button.source.pressed = pressed;
            events.extend(button.poll());
        }
        assert_eq!(events, [PressEvent::Double]);
    }

    #[test]
    fn debug_output_names_the_button() {
        let clock = TestClock::new(0);
        let capture = EdgeCapture::new();
        let button = Button::new(Interrupt, &clock, &capture, ButtonConfig::default());

        let text = format!("{:?}", button);
        assert!(text.starts_with("Button"));
        assert!(text.contains("Handlers"));
    }

    static ANY_CALLS: AtomicUsize = AtomicUsize::new(0);
    static LONG_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn count_any(_: PressEvent) {
        ANY_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn count_long() {
        LONG_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn poll_dispatches_handlers() {
        let clock = TestClock::new(0);
        let capture = EdgeCapture::new();
        let mut button = Button::new(Interrupt, &clock, &capture, ButtonConfig::default());
        button
            .handlers_mut()
            .on_any(count_any)
            .on(PressEvent::Long, count_long);

        capture.update(true, Timestamp::from_millis(0));
        clock.set(1);
        assert_eq!(button.poll(), None);
        capture.update(false, Timestamp::from_millis(700));
        clock.set(701);
        assert_eq!(button.poll(), Some(PressEvent::Long));
        clock.set(702);
        assert_eq!(button.poll(), None);

        assert_eq!(ANY_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(LONG_CALLS.load(Ordering::SeqCst), 1);
    }
}
