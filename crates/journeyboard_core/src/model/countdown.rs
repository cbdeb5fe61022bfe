//! Derived countdown snapshot. Never persisted.

use serde::Serialize;

/// Remaining time split into whole units; all zero once the target passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownState {
    pub days_total: i64,
    /// Always within `0..=days_total`.
    pub days_elapsed: i64,
    pub time_remaining: TimeRemaining,
    /// Always within `0.0..=100.0`.
    pub progress_percent: f64,
}

impl CountdownState {
    pub fn remaining_percent(&self) -> f64 {
        100.0 - self.progress_percent
    }
}
