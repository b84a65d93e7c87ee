#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Controller`**: the foreground loop core; multiplexes the display screens and interprets button presses
//! - **`AlarmClock`**: the `Idle -> Ringing -> Muted | Snoozed` alarm state machine with mute and snooze timing
//! - **`OneShot`**: a polled one-shot countdown (auto-mute, snooze)
//! - **`Button` / `EventQueue`**: debounced press identities carried from interrupt context to the loop
//! - **`FeedParser` / `fetch_headlines`**: bounded, chunk-order-invariant headline retrieval
//! - **`ScrollLine`**: one windowed scroll pass over the joined headlines
//! - **`TextDisplay` / `Buzzer` / `Sensor` / `FeedTransport` / `TimeSource`**: traits to implement for your hardware
//!
//! All interrupt-context work is limited to debouncing and enqueueing;
//! rendering, sensor reads and the blocking feed fetch happen only on
//! the foreground loop. Every container is bounded (`heapless`), so the
//! crate never allocates.

pub mod alarm;
pub mod controller;
pub mod display;
pub mod feed;
pub mod input;
pub mod scroll;
pub mod time;
pub mod timer;

pub use alarm::{AlarmClock, AlarmPhase, AlarmTime, Buzzer};
pub use controller::{Controller, TickAction};
pub use display::{
    DisplayMode, HardwareFault, RenderFrame, Sensor, SensorReading, TextDisplay, WeatherReport,
    DISPLAY_COLS, DISPLAY_ROWS,
};
pub use feed::{fetch_headlines, FeedBuffer, FeedParser, FeedTransport, NetworkFault};
pub use input::{
    Button, ButtonDebouncer, EventConsumer, EventProducer, EventQueue, SwitchLatch,
};
pub use scroll::{ScrollLine, SCROLL_STEP_MILLIS, SEPARATOR};
pub use time::{TimeDuration, TimeInstant, TimeSource, WallTime, Weekday};
pub use timer::OneShot;
