//! Daily progress calendar.
//!
//! # Responsibility
//! - Seed one pending record per date in `[start, start + journey_days]`.
//! - Toggle and reset completion flags with whole-collection writes.
//! - Group days by month for display.
//!
//! # Invariants
//! - The date set is generated once, at seed, and never resized.
//! - `reset` clears flags only; dates and count are preserved.
//! - "Today" is `clock::adjusted_today`, shared with the countdown.

use crate::clock::{adjusted_today, Clock};
use crate::locale::{month_names, Locale};
use crate::model::progress::{DayProgress, JourneyProgress};
use crate::store::{KvStore, Persistence, RecordStore};
use chrono::{Datelike, NaiveDate};
use log::info;
use std::str::FromStr;

/// Generates the full journey, inclusive of both ends.
pub fn generate_days(start: NaiveDate, journey_days: u32) -> JourneyProgress {
    JourneyProgress(
        start
            .iter_days()
            .take(journey_days as usize + 1)
            .map(DayProgress::pending)
            .collect(),
    )
}

/// Whether `date` is the shared adjusted "today".
pub fn is_today(date: NaiveDate, clock: &dyn Clock) -> bool {
    date == adjusted_today(clock)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty calendar.
    pub percent: u32,
}

/// Month selector for the grouped view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// `YYYY-MM`.
    Month(String),
}

impl FromStr for MonthFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(|date| Self::Month(date.format("%Y-%m").to_string()))
            .map_err(|_| format!("expected `all` or `YYYY-MM`, got `{value}`"))
    }
}

/// Days of one calendar month, in date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup<'a> {
    pub key: String,
    pub days: Vec<&'a DayProgress>,
}

impl MonthGroup<'_> {
    /// Empty grid cells before the first day (Sunday-first weeks).
    pub fn leading_blank_cells(&self) -> u32 {
        self.days
            .first()
            .map_or(0, |day| day.date.weekday().num_days_from_sunday())
    }

    /// `"<Month name> <year>"` in `locale`.
    pub fn label(&self, locale: Locale) -> String {
        match self.days.first() {
            Some(day) => format!(
                "{} {}",
                month_names(locale)[day.date.month0() as usize],
                day.date.year()
            ),
            None => self.key.clone(),
        }
    }
}

/// Progress calendar bound to its own record store.
pub struct ProgressCalendar<S> {
    store: RecordStore<S>,
    progress: JourneyProgress,
    persistence: Persistence,
}

impl<S: KvStore> ProgressCalendar<S> {
    /// Loads the calendar, seeding `[start, start + journey_days]` if absent.
    ///
    /// `start` and `journey_days` are ignored when a calendar already exists.
    pub fn mount(store: RecordStore<S>, start: NaiveDate, journey_days: u32) -> Self {
        let synced = store.seed_if_absent(|| generate_days(start, journey_days));
        info!(
            "event=calendar_mount module=calendar status=ok days={}",
            synced.value.len()
        );
        Self {
            store,
            progress: synced.value,
            persistence: synced.persistence,
        }
    }

    pub fn progress(&self) -> &JourneyProgress {
        &self.progress
    }

    /// Outcome of the most recent seed or write.
    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.progress.first_date()
    }

    /// Flips `pending`/`completed` for `date`. Unknown dates are a no-op.
    pub fn toggle(&mut self, date: NaiveDate) -> Persistence {
        if self.progress.get(date).is_none() {
            return Persistence::Unchanged;
        }
        self.apply(|progress| {
            JourneyProgress(
                progress
                    .days()
                    .iter()
                    .map(|day| DayProgress {
                        date: day.date,
                        completed: day.completed != (day.date == date),
                    })
                    .collect(),
            )
        })
    }

    /// Marks every day pending without touching the date set.
    pub fn reset(&mut self) -> Persistence {
        self.apply(|progress| {
            JourneyProgress(
                progress
                    .days()
                    .iter()
                    .map(|day| DayProgress::pending(day.date))
                    .collect(),
            )
        })
    }

    pub fn summary(&self) -> ProgressSummary {
        let total = self.progress.len();
        let completed = self.progress.days().iter().filter(|d| d.completed).count();
        let percent = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };
        ProgressSummary {
            completed,
            total,
            percent,
        }
    }

    /// Sorted unique `YYYY-MM` keys.
    pub fn months(&self) -> Vec<String> {
        let mut months = self
            .progress
            .days()
            .iter()
            .map(DayProgress::month_key)
            .collect::<Vec<_>>();
        months.sort();
        months.dedup();
        months
    }

    /// Days grouped by month, restricted by `filter`.
    pub fn grouped(&self, filter: &MonthFilter) -> Vec<MonthGroup<'_>> {
        let mut groups: Vec<MonthGroup<'_>> = Vec::new();
        for day in self.progress.days() {
            let key = day.month_key();
            if let MonthFilter::Month(selected) = filter {
                if *selected != key {
                    continue;
                }
            }
            match groups.last_mut() {
                Some(group) if group.key == key => group.days.push(day),
                _ => groups.push(MonthGroup {
                    key,
                    days: vec![day],
                }),
            }
        }
        groups
    }

    fn apply(&mut self, transform: impl FnOnce(&JourneyProgress) -> JourneyProgress) -> Persistence {
        let synced = self.store.mutate(&self.progress, transform);
        self.progress = synced.value;
        self.persistence = synced.persistence.clone();
        synced.persistence
    }
}
