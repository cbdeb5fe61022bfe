//! Core domain logic for JourneyBoard.
//! This crate is the single source of truth for persisted records and the
//! invariants every surface (FFI, CLI) relies on.

pub mod clock;
pub mod config;
pub mod db;
pub mod ids;
pub mod locale;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use clock::{adjusted_now, adjusted_today, Clock, FixedClock, SystemClock};
pub use config::{BoardConfig, ConfigError};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use locale::{Locale, StaticTranslator, Translator, UnsupportedLocale};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::countdown::{CountdownState, TimeRemaining};
pub use model::journal::{Category, JournalEntries, JournalEntry};
pub use model::progress::{DayProgress, JourneyProgress};
pub use model::workout::{
    Exercise, ExerciseField, FitnessStats, StatField, Step, WorkoutDay, WorkoutPlan,
};
pub use service::calendar::{MonthFilter, ProgressCalendar, ProgressSummary};
pub use service::countdown::CountdownEngine;
pub use service::fitness::FitnessTracker;
pub use service::journal::{CategoryFilter, EntryDraft, IdeasJournal, JournalError};
pub use service::shell::{active_section, JourneyBoard, Section, SectionBounds};
pub use service::ticker::CountdownTicker;
pub use store::{
    Collection, KvError, KvResult, KvStore, MemoryKvStore, Persistence, RecordStore, SqliteKvStore,
    StoreError, Synced,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
