use std::convert::Infallible;
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::digital::{ErrorType, InputPin};
use log::info;
use press_button_service::{ActiveState, Button, ButtonConfig, Clock, EdgeCapture, Polled, PressEvent, Timestamp};

/// Host clock truncated to the 32-bit millisecond counter, started near the wrap point
struct HostClock {
    start: Instant,
    offset: u32,
}

impl Clock for HostClock {
    fn now(&self) -> Timestamp {
        let elapsed = self.start.elapsed().as_millis() as u32;
        Timestamp::from_millis(self.offset.wrapping_add(elapsed))
    }
}

/// Active-low pin replaying `(pressed, hold ms)` steps
struct ScriptedPin {
    start: Instant,
    script: &'static [(bool, u64)],
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl ScriptedPin {
    fn pressed(&self) -> bool {
        let mut elapsed = self.start.elapsed().as_millis() as u64;
        for &(pressed, hold) in self.script {
            if elapsed < hold {
                return pressed;
            }
            elapsed -= hold;
        }
        false
    }
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed())
    }
}

const SCRIPT: &[(bool, u64)] = &[
    (false, 200),
    // Short
    (true, 120),
    (false, 600),
    // Constant while held, nothing on release
    (true, 1_600),
    (false, 400),
];

fn log_event(event: PressEvent) {
    info!("Classified {:?}", event);
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    let start = Instant::now();
    let clock = HostClock {
        start,
        offset: u32::MAX - 500,
    };
    let pin = ScriptedPin { start, script: SCRIPT };
    let edges = EdgeCapture::new();

    let mut button = Button::new(
        Polled::new(pin, ActiveState::ActiveLow),
        clock,
        &edges,
        ButtonConfig::default(),
    );
    button.handlers_mut().on_any(log_event);

    let total: u64 = SCRIPT.iter().map(|&(_, hold)| hold).sum();
    while start.elapsed() < Duration::from_millis(total + 500) {
        button.poll();
        thread::sleep(Duration::from_millis(5));
    }
    info!("Script finished");
}
