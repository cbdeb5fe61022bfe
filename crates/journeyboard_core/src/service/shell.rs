//! Page shell composing every feature over one storage backend.
//!
//! # Responsibility
//! - Mount locale preference, calendar, fitness tracker and journal, each
//!   with its own `RecordStore` handle.
//! - Own the single countdown ticker and cancel it on remount or teardown.
//! - Report the visible section for navigation highlighting.
//!
//! # Invariants
//! - Changing the locale rewrites only the locale preference.
//! - At most one ticker is alive per board.

use super::calendar::ProgressCalendar;
use super::countdown::CountdownEngine;
use super::fitness::FitnessTracker;
use super::journal::IdeasJournal;
use super::ticker::CountdownTicker;
use super::vision::{localized_vision_items, LocalizedVisionItem};
use crate::clock::{adjusted_today, Clock};
use crate::config::BoardConfig;
use crate::ids::IdGenerator;
use crate::locale::{Locale, StaticTranslator};
use crate::model::countdown::CountdownState;
use crate::store::{KvStore, Persistence, RecordStore, StoreError};
use log::{info, warn};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

/// Page sections, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    Vision,
    Progress,
    Fitness,
    Ideas,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Hero,
        Self::Vision,
        Self::Progress,
        Self::Fitness,
        Self::Ideas,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Vision => "vision",
            Self::Progress => "progress",
            Self::Fitness => "fitness",
            Self::Ideas => "ideas",
        }
    }
}

/// Viewport offset, in pixels, of the line that selects the active section.
pub const SECTION_PROBE_PX: f64 = 100.0;

/// Viewport-relative vertical extent of one rendered section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub section: Section,
    pub top: f64,
    pub bottom: f64,
}

/// First section (in the given order) spanning the probe line.
pub fn active_section(bounds: &[SectionBounds]) -> Option<Section> {
    bounds
        .iter()
        .find(|b| b.top <= SECTION_PROBE_PX && b.bottom >= SECTION_PROBE_PX)
        .map(|b| b.section)
}

/// Every feature mounted against one backend.
pub struct JourneyBoard<S> {
    config: BoardConfig,
    clock: Arc<dyn Clock>,
    preferences: RecordStore<S>,
    locale: Locale,
    locale_persistence: Persistence,
    calendar: ProgressCalendar<S>,
    fitness: FitnessTracker<S>,
    journal: IdeasJournal<S>,
    countdown: CountdownEngine,
    ticker: Option<CountdownTicker>,
}

impl<S: KvStore + Clone> JourneyBoard<S> {
    /// Loads or seeds every collection.
    ///
    /// Seed factories see the persisted locale (or `config.default_locale`
    /// on a fresh store) and the adjusted today of `clock`.
    pub fn mount(
        backend: S,
        config: BoardConfig,
        clock: Arc<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let preferences = RecordStore::new(backend.clone());
        let locale = preferences.seed_if_absent(|| config.default_locale);

        let today = adjusted_today(clock.as_ref());
        let calendar =
            ProgressCalendar::mount(RecordStore::new(backend.clone()), today, config.journey_days);
        let fitness = FitnessTracker::mount(RecordStore::new(backend.clone()), locale.value);
        let journal = IdeasJournal::mount(RecordStore::new(backend), ids, Arc::clone(&clock));

        let anchor = config
            .start_date
            .or_else(|| calendar.start_date())
            .unwrap_or(today);
        let countdown = CountdownEngine::from_start_date(anchor, config.target_date);

        info!(
            "event=board_mount module=shell status=ok locale={} anchor={}",
            locale.value, anchor
        );

        let board = Self {
            config,
            clock,
            preferences,
            locale: locale.value,
            locale_persistence: locale.persistence,
            calendar,
            fitness,
            journal,
            countdown,
            ticker: None,
        };
        for err in board.storage_warnings() {
            warn!("event=board_mount module=shell status=degraded error={err}");
        }
        board
    }
}

impl<S: KvStore> JourneyBoard<S> {
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn translator(&self) -> StaticTranslator {
        StaticTranslator::new(self.locale)
    }

    /// Persists a new locale preference. Other collections are untouched.
    pub fn set_locale(&mut self, locale: Locale) -> Persistence {
        self.locale = locale;
        self.locale_persistence = match self.preferences.save(&locale) {
            Ok(()) => Persistence::Saved,
            Err(err) => Persistence::MemoryOnly(err),
        };
        info!("event=locale_change module=shell status=ok locale={locale}");
        self.locale_persistence.clone()
    }

    pub fn calendar(&self) -> &ProgressCalendar<S> {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut ProgressCalendar<S> {
        &mut self.calendar
    }

    pub fn fitness(&self) -> &FitnessTracker<S> {
        &self.fitness
    }

    pub fn fitness_mut(&mut self) -> &mut FitnessTracker<S> {
        &mut self.fitness
    }

    pub fn journal(&self) -> &IdeasJournal<S> {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut IdeasJournal<S> {
        &mut self.journal
    }

    pub fn countdown(&self) -> &CountdownEngine {
        &self.countdown
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.countdown.snapshot(self.clock.as_ref())
    }

    pub fn vision_board(&self) -> Vec<LocalizedVisionItem> {
        localized_vision_items(&self.translator())
    }

    /// Starts the countdown ticker, cancelling any previous one first.
    pub fn start_ticker(&mut self) -> std::io::Result<Receiver<CountdownState>> {
        self.stop_ticker();
        let (ticker, states) = CountdownTicker::start(
            self.countdown,
            Arc::clone(&self.clock),
            Duration::from_millis(self.config.tick_interval_ms),
        )?;
        self.ticker = Some(ticker);
        Ok(states)
    }

    pub fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    pub fn has_active_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(CountdownTicker::is_running)
    }

    /// Storage errors from the latest write of each collection.
    pub fn storage_warnings(&self) -> Vec<&StoreError> {
        [
            &self.locale_persistence,
            self.calendar.persistence(),
            self.fitness.persistence(),
            self.journal.persistence(),
        ]
        .into_iter()
        .filter_map(Persistence::error)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{active_section, Section, SectionBounds};

    fn bounds(section: Section, top: f64, bottom: f64) -> SectionBounds {
        SectionBounds {
            section,
            top,
            bottom,
        }
    }

    #[test]
    fn active_section_is_first_spanning_probe_line() {
        let layout = [
            bounds(Section::Hero, -900.0, -20.0),
            bounds(Section::Vision, -20.0, 100.0),
            bounds(Section::Progress, 100.0, 900.0),
        ];
        assert_eq!(active_section(&layout), Some(Section::Vision));
    }

    #[test]
    fn no_section_when_probe_line_is_in_a_gap() {
        let layout = [
            bounds(Section::Hero, -900.0, 50.0),
            bounds(Section::Ideas, 150.0, 900.0),
        ];
        assert_eq!(active_section(&layout), None);
    }

    #[test]
    fn section_ids_are_stable() {
        let ids = Section::ALL.iter().map(|s| s.id()).collect::<Vec<_>>();
        assert_eq!(ids, ["hero", "vision", "progress", "fitness", "ideas"]);
    }
}
