//! Persisted record shapes, one module per feature.
//!
//! # Invariants
//! - Field names serialize in camelCase, matching the stored JSON layout.
//! - Each collection newtype owns exactly one storage key.

pub mod countdown;
pub mod journal;
pub mod progress;
pub mod workout;

use crate::locale::Locale;
use crate::store::Collection;

pub const JOURNEY_PROGRESS_KEY: &str = "journeyProgress";
pub const WORKOUT_PLAN_KEY: &str = "workoutPlan";
pub const FITNESS_STATS_KEY: &str = "fitnessStats";
pub const JOURNAL_ENTRIES_KEY: &str = "journalEntries";
pub const LOCALE_KEY: &str = "i18nextLng";

impl Collection for Locale {
    const KEY: &'static str = LOCALE_KEY;
}
