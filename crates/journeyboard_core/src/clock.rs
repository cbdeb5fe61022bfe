//! Wall-clock access and the adjusted "today" shared by every feature.
//!
//! # Invariants
//! - The 7-day backdate is applied here and nowhere else.
//! - Countdown and calendar derive "today" from the same function.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::RwLock;

/// Days subtracted from wall-clock time to obtain adjusted now.
pub const ADJUSTED_NOW_OFFSET_DAYS: i64 = 7;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        match self.instant.write() {
            Ok(mut guard) => *guard = instant,
            Err(poisoned) => *poisoned.into_inner() = instant,
        }
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time shifted back by [`ADJUSTED_NOW_OFFSET_DAYS`].
pub fn adjusted_now(clock: &dyn Clock) -> DateTime<Utc> {
    adjust(clock.now())
}

/// Calendar date (UTC) of [`adjusted_now`].
pub fn adjusted_today(clock: &dyn Clock) -> NaiveDate {
    adjusted_now(clock).date_naive()
}

/// Applies the backdate to an arbitrary instant.
pub fn adjust(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant - Duration::days(ADJUSTED_NOW_OFFSET_DAYS)
}
