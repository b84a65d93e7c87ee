//! Debounced button input and the interrupt-to-foreground event queue.
//!
//! Button edges arrive on interrupt context. The handler asks its
//! [`ButtonDebouncer`] whether the edge counts as a distinct press and,
//! if so, enqueues the [`Button`] identity. The foreground loop drains
//! the queue and decides what each press means, because the meaning
//! depends on the active sub-mode (the same physical button increments
//! the alarm hour while the set screen is open and mutes the buzzer
//! otherwise). Nothing on the interrupt side blocks, allocates or
//! touches a peripheral.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::time::{TimeDuration, TimeInstant};

/// Capacity of the button event queue. The underlying ring keeps one
/// slot free, leaving room for `EVENT_QUEUE_DEPTH - 1` queued presses.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Minimum interval between accepted presses of the same button.
pub const DEBOUNCE_MILLIS: u64 = 50;

/// Identity of the four edge-triggered buttons.
///
/// The queue carries identities rather than semantic events; the
/// controller owns the sub-mode and derives the meaning when draining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Advances the display mode.
    Mode,
    /// Opens the alarm set screen, or confirms it when already open.
    Set,
    /// Increments the alarm hour while setting; mutes otherwise.
    Hour,
    /// Increments the alarm minute while setting; snoozes otherwise.
    Minute,
}

/// Queue carrying button presses from interrupt context to the loop.
pub type EventQueue = Queue<Button, EVENT_QUEUE_DEPTH>;

/// Interrupt-side handle of the event queue.
pub type EventProducer<'a> = Producer<'a, Button>;

/// Foreground-side handle of the event queue.
pub type EventConsumer<'a> = Consumer<'a, Button>;

/// Minimum re-trigger gate for one button.
///
/// A single physical press can deliver a burst of falling edges. The
/// gate accepts the first and ignores followers until the debounce
/// interval has elapsed. One gate per button, consulted inside the
/// edge handler before enqueueing.
#[derive(Debug, Clone, Copy)]
pub struct ButtonDebouncer<I: TimeInstant> {
    last_accepted: Option<I>,
    interval_millis: u64,
}

impl<I: TimeInstant> ButtonDebouncer<I> {
    /// Creates a gate with the default interval of [`DEBOUNCE_MILLIS`].
    pub const fn new() -> Self {
        Self {
            last_accepted: None,
            interval_millis: DEBOUNCE_MILLIS,
        }
    }

    /// Creates a gate with a custom re-trigger interval.
    pub const fn with_interval(millis: u64) -> Self {
        Self {
            last_accepted: None,
            interval_millis: millis,
        }
    }

    /// Returns true when an edge at `now` counts as a distinct press.
    pub fn accept(&mut self, now: I) -> bool {
        let distinct = match self.last_accepted {
            None => true,
            Some(last) => now.duration_since(last).as_millis() >= self.interval_millis,
        };
        if distinct {
            self.last_accepted = Some(now);
        }
        distinct
    }
}

impl<I: TimeInstant> Default for ButtonDebouncer<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge latch for the level-sensed switch.
///
/// The switch is polled, not interrupt-driven. `update` reports `true`
/// exactly once per assertion, however many iterations the switch
/// stays held.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchLatch {
    held: bool,
}

impl SwitchLatch {
    pub const fn new() -> Self {
        Self { held: false }
    }

    /// Feeds the current switch level; returns true on a new assertion.
    pub fn update(&mut self, asserted: bool) -> bool {
        let edge = asserted && !self.held;
        self.held = asserted;
        edge
    }

    /// The level seen by the most recent `update`.
    pub fn is_held(&self) -> bool {
        self.held
    }
}
