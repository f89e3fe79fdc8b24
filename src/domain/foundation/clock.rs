//! Clock abstraction for time-dependent domain logic.
//!
//! The recurrence window and the poll cooldown both compare against "now".
//! Handlers take the current time from an injected clock instead of reading
//! ambient time, so both checks are deterministically testable.

use std::sync::Mutex;

use super::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current moment.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually controlled clock, primarily for tests.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// Creates a clock frozen at the given moment.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Moves the clock to a specific moment.
    pub fn set(&self, ts: Timestamp) {
        *self.current.lock().unwrap() = ts;
    }

    /// Advances the clock by the given number of seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut current = self.current.lock().unwrap();
        *current = current.plus_secs(secs);
    }

    /// Advances the clock by the given number of days.
    pub fn advance_days(&self, days: i64) {
        let mut current = self.current.lock().unwrap();
        *current = current.add_days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_real_time() {
        let clock = SystemClock;
        let before = Timestamp::now();
        let now = clock.now();
        assert!(!now.is_before(&before));
    }

    #[test]
    fn manual_clock_stays_frozen() {
        let start = Timestamp::from_unix_secs(1_518_652_800);
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn manual_clock_advances_on_demand() {
        let start = Timestamp::from_unix_secs(1_518_652_800);
        let clock = ManualClock::new(start);

        clock.advance_secs(10);
        assert_eq!(clock.now(), start.plus_secs(10));

        clock.advance_days(30);
        assert_eq!(clock.now(), start.plus_secs(10).add_days(30));
    }

    #[test]
    fn clock_is_object_safe() {
        fn _accepts_dyn(_clock: &dyn Clock) {}
    }
}
