use chrono::{Duration, NaiveDate, TimeZone, Utc};
use journeyboard_core::model::{
    FITNESS_STATS_KEY, JOURNAL_ENTRIES_KEY, JOURNEY_PROGRESS_KEY, LOCALE_KEY, WORKOUT_PLAN_KEY,
};
use journeyboard_core::{
    BoardConfig, Clock, EntryDraft, ExerciseField, FixedClock, JourneyBoard, KvStore, Locale,
    MemoryKvStore, Persistence, SequentialIds, SqliteKvStore, Step,
};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration as StdDuration;

fn clock() -> Arc<FixedClock> {
    // Adjusted today is 2025-05-25.
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ))
}

fn mount(backend: &Rc<MemoryKvStore>, clock: Arc<FixedClock>) -> JourneyBoard<Rc<MemoryKvStore>> {
    JourneyBoard::mount(
        Rc::clone(backend),
        BoardConfig::default(),
        clock,
        Box::new(SequentialIds::new("entry")),
    )
}

#[test]
fn fresh_store_seeds_every_collection_in_default_locale() {
    let backend = Rc::new(MemoryKvStore::new());
    let board = mount(&backend, clock());

    assert_eq!(board.locale(), Locale::Ru);
    assert_eq!(
        backend.get(LOCALE_KEY).unwrap().as_deref(),
        Some("\"ru\"")
    );
    assert_eq!(
        board.calendar().start_date(),
        NaiveDate::from_ymd_opt(2025, 5, 25)
    );
    assert_eq!(board.calendar().progress().len(), 381);
    assert_eq!(board.fitness().plan().days()[0].day, "Понедельник");
    assert!(board.journal().entries().is_empty());
    assert!(board.storage_warnings().is_empty());

    let keys = backend.keys();
    for key in ["fitnessStats", "journalEntries", "journeyProgress", "i18nextLng", "workoutPlan"] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
}

#[test]
fn remounting_leaves_every_stored_collection_byte_identical() {
    let keys = [
        JOURNEY_PROGRESS_KEY,
        WORKOUT_PLAN_KEY,
        FITNESS_STATS_KEY,
        JOURNAL_ENTRIES_KEY,
        LOCALE_KEY,
    ];
    let backend = Rc::new(MemoryKvStore::new());
    drop(mount(&backend, clock()));
    let writes = backend.write_count();
    let before = keys
        .iter()
        .map(|key| backend.get(key).unwrap())
        .collect::<Vec<_>>();
    assert!(before.iter().all(Option::is_some));

    let later = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap(),
    ));
    let board = mount(&backend, later);
    let after = keys
        .iter()
        .map(|key| backend.get(key).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(before, after);
    assert_eq!(backend.write_count(), writes);
    assert!(board.storage_warnings().is_empty());
}

#[test]
fn countdown_and_calendar_share_adjusted_today() {
    let backend = Rc::new(MemoryKvStore::new());
    let clock = clock();
    let board = mount(&backend, Arc::clone(&clock));

    let state = board.countdown_state();
    assert_eq!(state.days_elapsed, 0);
    assert_eq!(state.days_total, 365);
    assert_eq!(state.progress_percent, 0.0);

    clock.advance(Duration::days(73));
    let later = board.countdown_state();
    assert_eq!(later.days_elapsed, 73);
    assert!((later.progress_percent - 20.0).abs() < 1e-9);
}

#[test]
fn changing_locale_does_not_reseed_other_collections() {
    let backend = Rc::new(MemoryKvStore::new());
    let mut board = mount(&backend, clock());
    let plan_before = backend.get(WORKOUT_PLAN_KEY).unwrap();
    let progress_before = backend.get(JOURNEY_PROGRESS_KEY).unwrap();

    assert_eq!(board.set_locale(Locale::En), Persistence::Saved);
    assert_eq!(board.locale(), Locale::En);
    assert_eq!(board.fitness().plan().days()[0].day, "Понедельник");
    assert_eq!(board.vision_board()[5].title, "Hajj");

    let remounted = mount(&backend, clock());
    assert_eq!(remounted.locale(), Locale::En);
    assert_eq!(remounted.fitness().stats().current_weight, 82.0);
    assert_eq!(backend.get(WORKOUT_PLAN_KEY).unwrap(), plan_before);
    assert_eq!(backend.get(JOURNEY_PROGRESS_KEY).unwrap(), progress_before);
}

#[test]
fn explicit_start_date_anchors_countdown() {
    let backend = Rc::new(MemoryKvStore::new());
    let config = BoardConfig {
        start_date: NaiveDate::from_ymd_opt(2025, 5, 10),
        ..BoardConfig::default()
    };
    let board = JourneyBoard::mount(
        Rc::clone(&backend),
        config,
        clock(),
        Box::new(SequentialIds::new("entry")),
    );
    let state = board.countdown_state();
    assert_eq!(state.days_total, 380);
    assert_eq!(state.days_elapsed, 15);
}

#[test]
fn unavailable_storage_keeps_board_usable_in_memory() {
    let backend = Rc::new(MemoryKvStore::new());
    backend.set_available(false);
    let mut board = mount(&backend, clock());

    assert_eq!(board.storage_warnings().len(), 4);
    assert_eq!(board.calendar().progress().len(), 381);

    let day = NaiveDate::from_ymd_opt(2025, 5, 26).unwrap();
    assert!(board.calendar_mut().toggle(day).is_memory_only());
    assert!(board.calendar().progress().get(day).unwrap().completed);

    board
        .fitness_mut()
        .adjust(1, 1, ExerciseField::Sets, Step::Increment);
    assert_eq!(board.fitness().plan().exercise(1, 1).unwrap().sets, 5);

    let added = board
        .journal_mut()
        .add(EntryDraft::new("Offline", "still works"))
        .unwrap();
    assert!(added.persistence.is_memory_only());
    assert_eq!(board.journal().entries().len(), 1);
}

#[test]
fn ticker_is_replaced_and_stopped() {
    let backend = Rc::new(MemoryKvStore::new());
    let mut board = mount(&backend, clock());

    let first = board.start_ticker().unwrap();
    first.recv_timeout(StdDuration::from_secs(2)).unwrap();
    assert!(board.has_active_ticker());

    let second = board.start_ticker().unwrap();
    while first.try_recv().is_ok() {}
    assert!(first.recv_timeout(StdDuration::from_millis(50)).is_err());
    assert_eq!(
        second.recv_timeout(StdDuration::from_secs(2)).unwrap(),
        board.countdown_state()
    );

    board.stop_ticker();
    assert!(!board.has_active_ticker());
}

#[test]
fn board_runs_over_sqlite_backend() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SqliteKvStore::open(dir.path().join("board.sqlite3"), None).unwrap();
    let clock = clock();
    {
        let mut board = JourneyBoard::mount(
            &store,
            BoardConfig::default(),
            Arc::clone(&clock) as Arc<dyn Clock>,
            Box::new(SequentialIds::new("entry")),
        );
        board
            .calendar_mut()
            .toggle(NaiveDate::from_ymd_opt(2025, 5, 25).unwrap());
    }
    let board = JourneyBoard::mount(
        &store,
        BoardConfig::default(),
        clock,
        Box::new(SequentialIds::new("entry")),
    );
    assert_eq!(board.calendar().summary().completed, 1);
}
