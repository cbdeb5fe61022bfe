//! Countdown arithmetic between a fixed start and target.
//!
//! # Invariants
//! - `0 <= days_elapsed <= days_total` and `0 <= progress_percent <= 100`.
//! - Callers pass adjusted now; the engine applies the offset via `clock`.

use crate::clock::{adjusted_now, Clock};
use crate::model::countdown::{CountdownState, TimeRemaining};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Computes the countdown snapshot for one instant.
///
/// A non-positive span between `start` and `target` counts as a finished
/// journey: 100 percent, zero elapsed days.
pub fn countdown_state(
    start: DateTime<Utc>,
    target: DateTime<Utc>,
    adjusted_now: DateTime<Utc>,
) -> CountdownState {
    let days_total = ceil_div((target - start).num_milliseconds(), DAY_MS);
    let days_elapsed = (adjusted_now - start)
        .num_milliseconds()
        .div_euclid(DAY_MS)
        .clamp(0, days_total.max(0));

    let progress_percent = if days_total <= 0 {
        100.0
    } else {
        (days_elapsed as f64 / days_total as f64 * 100.0).clamp(0.0, 100.0)
    };

    CountdownState {
        days_total,
        days_elapsed,
        time_remaining: split_remaining((target - adjusted_now).num_milliseconds()),
        progress_percent,
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    -((-value).div_euclid(divisor))
}

fn split_remaining(millis: i64) -> TimeRemaining {
    if millis <= 0 {
        return TimeRemaining::default();
    }
    TimeRemaining {
        days: millis / DAY_MS,
        hours: (millis % DAY_MS) / HOUR_MS,
        minutes: (millis % HOUR_MS) / MINUTE_MS,
        seconds: (millis % MINUTE_MS) / SECOND_MS,
    }
}

/// Fixed `(start, target)` pair evaluated against a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownEngine {
    start: DateTime<Utc>,
    target: DateTime<Utc>,
}

impl CountdownEngine {
    pub fn new(start: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        Self { start, target }
    }

    /// Anchors the start at midnight UTC of `start`.
    pub fn from_start_date(start: NaiveDate, target: DateTime<Utc>) -> Self {
        Self::new(start.and_time(NaiveTime::default()).and_utc(), target)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Snapshot at the clock's adjusted now.
    pub fn snapshot(&self, clock: &dyn Clock) -> CountdownState {
        self.state_at(adjusted_now(clock))
    }

    /// Snapshot at an explicit adjusted instant.
    pub fn state_at(&self, adjusted_now: DateTime<Utc>) -> CountdownState {
        countdown_state(self.start, self.target, adjusted_now)
    }
}

#[cfg(test)]
mod tests {
    use super::{ceil_div, countdown_state, CountdownEngine};
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn ceil_div_rounds_toward_positive_infinity() {
        assert_eq!(ceil_div(10, 5), 2);
        assert_eq!(ceil_div(11, 5), 3);
        assert_eq!(ceil_div(-11, 5), -2);
        assert_eq!(ceil_div(0, 5), 0);
    }

    #[test]
    fn partial_day_span_rounds_total_up() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let target = start + Duration::days(10) + Duration::hours(1);
        let state = countdown_state(start, target, start);
        assert_eq!(state.days_total, 11);
    }

    #[test]
    fn remaining_time_splits_into_units() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let target = start + Duration::days(30);
        let now = target
            - (Duration::days(2)
                + Duration::hours(3)
                + Duration::minutes(4)
                + Duration::seconds(5)
                + Duration::milliseconds(600));
        let remaining = countdown_state(start, target, now).time_remaining;
        assert_eq!(
            (remaining.days, remaining.hours, remaining.minutes, remaining.seconds),
            (2, 3, 4, 5)
        );
    }

    #[test]
    fn before_start_clamps_to_zero() {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let target = start + Duration::days(100);
        let state = countdown_state(start, target, start - Duration::days(3));
        assert_eq!(state.days_elapsed, 0);
        assert_eq!(state.progress_percent, 0.0);
        assert_eq!(state.time_remaining.days, 103);
    }

    #[test]
    fn inverted_range_reports_complete() {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let state = countdown_state(start, start - Duration::days(1), start);
        assert_eq!(state.days_elapsed, 0);
        assert_eq!(state.progress_percent, 100.0);
        assert!(state.time_remaining.is_zero());
    }

    #[test]
    fn engine_applies_seven_day_backdate() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let engine = CountdownEngine::new(start, start + Duration::days(100));
        let clock = FixedClock::new(start + Duration::days(17));
        assert_eq!(engine.snapshot(&clock).days_elapsed, 10);
    }
}
