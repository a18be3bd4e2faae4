//! Async polling helpers for embassy executors

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Ticker};

use crate::button::Button;
use crate::capture::EdgeSource;
use crate::event::PressEvent;
use crate::time::Clock;

/// Polls `button` every `period` forever, forwarding each event to `sender`.
///
/// Handlers registered on the button still run synchronously inside each poll; the
/// channel is for consumers living in other tasks.
pub async fn run<S: EdgeSource, C: Clock, M: RawMutex, const N: usize>(
    button: &mut Button<'_, S, C>,
    period: Duration,
    sender: Sender<'_, M, PressEvent, N>,
) -> ! {
    info!("Polling button every {} ms", period.as_millis());
    let mut ticker = Ticker::every(period);
    loop {
        if let Some(event) = button.poll() {
            sender.send(event).await;
        }
        ticker.next().await;
    }
}

#[cfg(test)]
mod test {
    use core::cell::Cell;

    use embassy_futures::block_on;
    use embassy_futures::select::{select, Either};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    use super::*;
    use crate::capture::{EdgeCapture, Interrupt};
    use crate::config::ButtonConfig;
    use crate::time::Timestamp;

    struct TestClock(Cell<u32>);

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0.get())
        }
    }

    #[test]
    fn first_tick_forwards_event() {
        let clock = TestClock(Cell::new(2_000));
        let capture = EdgeCapture::new();
        // Held since 0, so the first poll already reports the hold
        capture.update(true, Timestamp::from_millis(0));
        let mut button = Button::new(Interrupt, &clock, &capture, ButtonConfig::default());
        let events: Channel<NoopRawMutex, PressEvent, 2> = Channel::new();

        let received = block_on(select(
            run(&mut button, Duration::from_millis(10), events.sender()),
            events.receive(),
        ));

        match received {
            Either::Second(event) => assert_eq!(event, PressEvent::Constant),
            Either::First(_) => unreachable!(),
        }
        assert!(events.is_empty());
        assert!(button.is_pressed());
    }
}
