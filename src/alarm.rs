//! Alarm state machine with mute and snooze timing.
//!
//! Provides [`AlarmClock`], which owns the configured time, the enabled
//! flag, the activity phase and both countdown timers, and drives the
//! buzzer output. Also defines the [`Buzzer`] trait for hardware
//! abstraction.

use crate::time::{TimeDuration, TimeInstant, WallTime};
use crate::timer::OneShot;

/// Seconds of ringing before the alarm silences itself.
pub const AUTO_MUTE_SECS: u64 = 600;

/// Shortened self-silence window after a snooze expires.
pub const AUTO_MUTE_AFTER_SNOOZE_SECS: u64 = 10;

/// Snooze length in seconds.
pub const SNOOZE_SECS: u64 = 300;

/// Buzzer duty while ringing.
pub const RING_LEVEL: f32 = 0.5;

/// Trait for abstracting the buzzer output.
///
/// `level` is a PWM duty in the 0.0-1.0 range. Implementations convert
/// it to their hardware's native format and handle any errors
/// internally - this method cannot fail.
pub trait Buzzer {
    /// Drives the buzzer at the given duty.
    fn set_level(&mut self, level: f32);
}

/// The alarm's activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmPhase {
    /// Silent; waiting for the configured time.
    Idle,
    /// Buzzer on; the wall clock reached the alarm time.
    Ringing,
    /// Silenced for the remainder of the matching minute.
    Muted,
    /// Silenced until the snooze countdown expires.
    Snoozed,
}

/// An alarm time of day.
///
/// The fields are private and the only mutations are the wrapping
/// increments, so `hour < 24 && minute < 60` holds for every value
/// that can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// 00:00.
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Creates a time of day, rejecting out-of-range values.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Advances the hour, wrapping 23 back to 0.
    pub fn increment_hour(&mut self) {
        self.hour = (self.hour + 1) % 24;
    }

    /// Advances the minute, wrapping 59 back to 0.
    pub fn increment_minute(&mut self) {
        self.minute = (self.minute + 1) % 60;
    }

    fn matches(&self, wall: &WallTime) -> bool {
        self.hour == wall.hour && self.minute == wall.minute
    }
}

/// Drives the buzzer through the `Idle -> Ringing -> Muted | Snoozed`
/// lifecycle.
///
/// All state changes happen on the foreground loop: interrupt handlers
/// only enqueue button identities, and the loop calls [`mute`] or
/// [`snooze`] while [`service`] runs the countdowns and the wall-clock
/// check once per iteration. Every operation is total; an event that
/// does not apply in the current phase leaves the machine unchanged.
///
/// A matching minute rings at most once. The match guard clears when
/// the wall clock leaves the alarm minute, which also drains a lasting
/// `Muted` phase back to `Idle`, so a muted alarm stays quiet for the
/// rest of that minute and rings again the next day.
///
/// [`mute`]: AlarmClock::mute
/// [`snooze`]: AlarmClock::snooze
/// [`service`]: AlarmClock::service
pub struct AlarmClock<I: TimeInstant, B: Buzzer> {
    time: AlarmTime,
    enabled: bool,
    phase: AlarmPhase,
    buzzer: B,
    level: f32,
    auto_mute_timer: OneShot<I>,
    snooze_timer: OneShot<I>,
    fired_this_minute: bool,
}

impl<I: TimeInstant, B: Buzzer> AlarmClock<I, B> {
    /// Creates a disabled alarm at midnight with the buzzer off.
    pub fn new(mut buzzer: B) -> Self {
        buzzer.set_level(0.0);

        Self {
            time: AlarmTime::MIDNIGHT,
            enabled: false,
            phase: AlarmPhase::Idle,
            buzzer,
            level: 0.0,
            auto_mute_timer: OneShot::new(),
            snooze_timer: OneShot::new(),
            fired_this_minute: false,
        }
    }

    /// Runs the once-per-minute match check and the countdowns.
    ///
    /// Call once per foreground loop iteration with a fresh monotonic
    /// instant and wall-clock sample. The match check runs before the
    /// countdown polls so a phase produced by an expiry stays
    /// observable for at least one iteration.
    pub fn service(&mut self, now: I, wall: WallTime) {
        if self.enabled && self.time.matches(&wall) {
            if self.phase == AlarmPhase::Idle && !self.fired_this_minute {
                self.fired_this_minute = true;
                self.phase = AlarmPhase::Ringing;
                self.drive(RING_LEVEL);
                self.auto_mute_timer
                    .arm(now, I::Duration::from_secs(AUTO_MUTE_SECS));
            }
        } else {
            self.fired_this_minute = false;
            if self.phase == AlarmPhase::Muted {
                self.phase = AlarmPhase::Idle;
            }
        }

        if self.snooze_timer.poll(now) && self.phase == AlarmPhase::Snoozed {
            self.phase = AlarmPhase::Ringing;
            self.drive(RING_LEVEL);
            self.auto_mute_timer
                .arm(now, I::Duration::from_secs(AUTO_MUTE_AFTER_SNOOZE_SECS));
        }

        if self.auto_mute_timer.poll(now) && self.phase == AlarmPhase::Ringing {
            self.phase = AlarmPhase::Muted;
            self.drive(0.0);
        }
    }

    /// Silences a ringing or snoozed alarm until the minute rolls over.
    pub fn mute(&mut self) {
        match self.phase {
            AlarmPhase::Ringing => {
                self.phase = AlarmPhase::Muted;
                self.auto_mute_timer.cancel();
                self.drive(0.0);
            }
            AlarmPhase::Snoozed => {
                self.phase = AlarmPhase::Muted;
                self.snooze_timer.cancel();
            }
            AlarmPhase::Idle | AlarmPhase::Muted => {}
        }
    }

    /// Postpones a ringing alarm for [`SNOOZE_SECS`].
    ///
    /// When the snooze expires the alarm rings again with the
    /// shortened [`AUTO_MUTE_AFTER_SNOOZE_SECS`] window.
    pub fn snooze(&mut self, now: I) {
        if self.phase == AlarmPhase::Ringing {
            self.phase = AlarmPhase::Snoozed;
            self.auto_mute_timer.cancel();
            self.snooze_timer.arm(now, I::Duration::from_secs(SNOOZE_SECS));
            self.drive(0.0);
        }
    }

    /// Enables or disables the alarm. Disabling silences immediately
    /// and cancels both countdowns.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.phase = AlarmPhase::Idle;
            self.auto_mute_timer.cancel();
            self.snooze_timer.cancel();
            self.fired_this_minute = false;
            self.drive(0.0);
        }
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.enabled);
    }

    /// Confirms the set screen: enables the alarm and lifts a mute.
    ///
    /// Clearing the match guard here lets a just-confirmed alarm ring
    /// within the current minute.
    pub fn confirm(&mut self) {
        self.enabled = true;
        if self.phase == AlarmPhase::Muted {
            self.phase = AlarmPhase::Idle;
        }
        self.fired_this_minute = false;
    }

    /// Advances the configured hour. Only meaningful while the set
    /// screen is open; the controller enforces that.
    pub fn increment_hour(&mut self) {
        self.time.increment_hour();
    }

    /// Advances the configured minute.
    pub fn increment_minute(&mut self) {
        self.time.increment_minute();
    }

    pub fn time(&self) -> AlarmTime {
        self.time
    }

    pub fn phase(&self) -> AlarmPhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The duty most recently written to the buzzer.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True while the ringing self-silence countdown is pending.
    pub fn auto_mute_pending(&self) -> bool {
        self.auto_mute_timer.is_armed()
    }

    /// True while a snooze countdown is pending.
    pub fn snooze_pending(&self) -> bool {
        self.snooze_timer.is_armed()
    }

    fn drive(&mut self, level: f32) {
        // Write through only on change; the service call runs every
        // loop iteration.
        if level != self.level {
            self.buzzer.set_level(level);
            self.level = level;
        }
    }
}
