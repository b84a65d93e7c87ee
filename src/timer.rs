//! One-shot countdowns polled from the foreground loop.

use crate::time::{TimeDuration, TimeInstant};

/// A one-shot countdown.
///
/// Arming records the current instant and the delay; the owner polls
/// the timer each loop iteration and observes the expiry exactly once.
/// Re-arming while armed replaces the previous deadline, and
/// cancelling an idle timer is a no-op. The deadline is kept as a
/// start/delay pair so expiry is decided with `duration_since` from
/// the start, which is always well defined.
#[derive(Debug, Clone, Copy)]
pub struct OneShot<I: TimeInstant> {
    armed: Option<(I, I::Duration)>,
}

impl<I: TimeInstant> OneShot<I> {
    /// Creates a disarmed timer.
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Schedules the timer to expire `after` from `now`.
    pub fn arm(&mut self, now: I, after: I::Duration) {
        self.armed = Some((now, after));
    }

    /// Disarms a pending timer.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Returns true once the armed deadline has passed, then disarms.
    pub fn poll(&mut self, now: I) -> bool {
        match self.armed {
            Some((since, after)) if now.duration_since(since).as_millis() >= after.as_millis() => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

impl<I: TimeInstant> Default for OneShot<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeDuration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestDuration(u64);

    impl TimeDuration for TestDuration {
        const ZERO: Self = TestDuration(0);

        fn as_millis(&self) -> u64 {
            self.0
        }

        fn from_millis(millis: u64) -> Self {
            TestDuration(millis)
        }

        fn saturating_sub(self, other: Self) -> Self {
            TestDuration(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestInstant(u64);

    impl TimeInstant for TestInstant {
        type Duration = TestDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            TestDuration(self.0 - earlier.0)
        }

        fn checked_add(self, duration: Self::Duration) -> Option<Self> {
            self.0.checked_add(duration.0).map(TestInstant)
        }

        fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
            self.0.checked_sub(duration.0).map(TestInstant)
        }
    }

    #[test]
    fn fires_exactly_once_after_the_delay() {
        let mut timer = OneShot::new();
        timer.arm(TestInstant(0), TestDuration(500));

        assert!(!timer.poll(TestInstant(499)));
        assert!(timer.poll(TestInstant(500)));
        assert!(!timer.poll(TestInstant(501)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn cancel_prevents_the_expiry() {
        let mut timer = OneShot::new();
        timer.arm(TestInstant(0), TestDuration(100));
        timer.cancel();

        assert!(!timer.poll(TestInstant(1000)));
    }

    #[test]
    fn cancel_when_idle_is_a_no_op() {
        let mut timer: OneShot<TestInstant> = OneShot::new();
        timer.cancel();
        assert!(!timer.is_armed());
    }

    #[test]
    fn re_arming_replaces_the_deadline() {
        let mut timer = OneShot::new();
        timer.arm(TestInstant(0), TestDuration(100));
        timer.arm(TestInstant(50), TestDuration(500));

        assert!(!timer.poll(TestInstant(200)));
        assert!(timer.poll(TestInstant(550)));
    }

    #[test]
    fn polling_a_disarmed_timer_never_fires() {
        let mut timer: OneShot<TestInstant> = OneShot::new();
        assert!(!timer.poll(TestInstant(0)));
        assert!(!timer.poll(TestInstant(u64::MAX)));
    }
}
