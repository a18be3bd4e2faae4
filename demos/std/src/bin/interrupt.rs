use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use log::info;
use press_button_service::{task, Button, ButtonConfig, Clock, EdgeCapture, Interrupt, PressEvent, SystemClock};
use static_cell::StaticCell;

/// Capture slot for the simulated button line
static EDGES: EdgeCapture = EdgeCapture::new();

static EVENTS: Channel<CriticalSectionRawMutex, PressEvent, 4> = Channel::new();

/// Level changes as `(pressed, hold ms)`
const SCRIPT: &[(bool, u64)] = &[
    // Double
    (true, 100),
    (false, 100),
    (true, 100),
    (false, 600),
    // Long
    (true, 700),
    (false, 600),
    // Constant, then nothing on release
    (true, 2_000),
    (false, 600),
    // Tiny
    (true, 30),
    (false, 600),
];

/// Stands in for the GPIO interrupt: stamps each level change into the capture slot
#[embassy_executor::task]
async fn edge_producer() {
    for &(pressed, hold) in SCRIPT {
        EDGES.update(pressed, SystemClock.now());
        Timer::after(Duration::from_millis(hold)).await;
    }
    info!("Script finished");
}

#[embassy_executor::task]
async fn button() {
    let config = ButtonConfig::or_default(ButtonConfig::new(
        Duration::from_millis(10),
        Duration::from_millis(50),
        Duration::from_millis(250),
        Duration::from_millis(500),
        Duration::from_millis(1500),
    ));
    let mut button = Button::new(Interrupt, SystemClock, &EDGES, config);
    button
        .handlers_mut()
        .on(PressEvent::Double, || info!("Double press handler"))
        .on(PressEvent::Constant, || info!("Constant press handler"));

    task::run(&mut button, Duration::from_millis(20), EVENTS.sender()).await
}

#[embassy_executor::task]
async fn event_logger() {
    loop {
        let event = EVENTS.receive().await;
        info!("Classified {:?}", event);
    }
}

#[embassy_executor::task]
async fn run(spawner: Spawner) {
    spawner.must_spawn(event_logger());
    spawner.must_spawn(button());
    spawner.must_spawn(edge_producer());
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Debug).init();

    static EXECUTOR: StaticCell<Executor> = StaticCell::new();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(run(spawner));
    });
}
