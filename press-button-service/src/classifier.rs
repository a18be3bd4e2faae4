//! Press classification state machine
//!
//! The classifier compares each [`EdgeSample`] against the level it last saw, so it
//! never depends on anything the edge producer might be changing mid-poll. Press and
//! release edges bucket the press duration against the configured thresholds; two
//! time-driven checks run on every call regardless of edges:
//!
//! - a provisional short press is reported as `Short` once its double window expires;
//! - a hold longer than the super threshold reports `Constant`, once per hold.
//!
//! Time-driven checks never count an edge stamped after `now` as elapsed time, since
//! an interrupt may record an edge between the poll's clock read and its use.
//!
//! Events resolve in timestamp order. When a pending short expired before the waiting
//! edge happened, `Short` is returned and the edge is left for the next call.

use crate::capture::EdgeSample;
use crate::config::ButtonConfig;
use crate::event::PressEvent;
use crate::time::Timestamp;

/// Logical state of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Released, nothing pending.
    Idle,
    /// Pressed, timing in progress. A short press may also be pending.
    Held,
    /// Released after a short press, waiting for a second one.
    ShortPending,
}

/// Turns edge samples into [`PressEvent`]s.
///
/// Must be driven from a single context; it is never touched by the edge producer.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ButtonConfig,
    pressed: bool,
    press_start: Timestamp,
    release_time: Timestamp,
    /// Release time of a short press awaiting its double window.
    pending_short: Option<Timestamp>,
    constant_reported: bool,
}

impl Classifier {
    /// Creates an idle classifier.
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            pressed: false,
            press_start: Timestamp::default(),
            release_time: Timestamp::default(),
            pending_short: None,
            constant_reported: false,
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Level as of the last consumed edge.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Time of the last consumed release edge.
    pub fn last_release(&self) -> Timestamp {
        self.release_time
    }

    /// Current logical state.
    pub fn phase(&self) -> Phase {
        if self.pressed {
            Phase::Held
        } else if self.pending_short.is_some() {
            Phase::ShortPending
        } else {
            Phase::Idle
        }
    }

    /// Advances the state machine with the latest sample. Returns at most one event.
    pub fn update(&mut self, sample: EdgeSample, now: Timestamp) -> Option<PressEvent> {
        let edge = sample.pressed != self.pressed;

        // A short press whose window closed before this edge is older than the edge
        if edge && self.expire_pending_short(sample.at) {
            return Some(PressEvent::Short);
        }

        if edge {
            let event = if sample.pressed {
                self.on_press(sample.at);
                None
            } else {
                self.on_release(sample.at)
            };
            if event.is_some() {
                return event;
            }
        }

        if self.expire_pending_short(now) {
            return Some(PressEvent::Short);
        }

        self.check_constant(now)
    }

    fn expire_pending_short(&mut self, at: Timestamp) -> bool {
        match self.pending_short {
            Some(released) if at.elapsed_since(released) > self.config.double_ms() => {
                self.pending_short = None;
                true
            }
            _ => false,
        }
    }

    fn on_press(&mut self, at: Timestamp) {
        debug!("Button pressed at {}", at.as_millis());
        self.pressed = true;
        self.press_start = at;
        self.constant_reported = false;
    }

    fn on_release(&mut self, at: Timestamp) -> Option<PressEvent> {
        self.pressed = false;
        self.release_time = at;

        let held = at.millis_since(self.press_start);
        debug!("Button released at {} after {} ms", at.as_millis(), held);

        if self.constant_reported && !self.config.release_after_constant() {
            // This hold was already reported as Constant
            return None;
        }

        let config = &self.config;
        if held < config.tiny_ms() {
            None
        } else if held < config.short_ms() {
            Some(PressEvent::Tiny)
        } else if held < config.long_ms() {
            match self.pending_short {
                Some(first) if at.millis_since(first) <= config.double_ms() => {
                    self.pending_short = None;
                    Some(PressEvent::Double)
                }
                _ => {
                    self.pending_short = Some(at);
                    None
                }
            }
        } else if held < config.super_ms() {
            Some(PressEvent::Long)
        } else {
            Some(PressEvent::Super)
        }
    }

    fn check_constant(&mut self, now: Timestamp) -> Option<PressEvent> {
        if self.pressed && !self.constant_reported && now.elapsed_since(self.press_start) > self.config.super_ms() {
            self.constant_reported = true;
            return Some(PressEvent::Constant);
        }
        None
    }
}
