use journeyboard_core::model::{JOURNAL_ENTRIES_KEY, JOURNEY_PROGRESS_KEY, LOCALE_KEY};
use journeyboard_core::service::calendar::generate_days;
use journeyboard_core::{
    Category, JournalEntries, JournalEntry, JourneyProgress, KvError, KvResult, KvStore, Locale,
    MemoryKvStore, Persistence, RecordStore, StoreError,
};
use chrono::NaiveDate;
use std::cell::Cell;

/// Backend whose first read fails as a locked database would.
struct LockedOnFirstRead {
    inner: MemoryKvStore,
    reads: Cell<u32>,
}

impl KvStore for LockedOnFirstRead {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.reads.set(self.reads.get() + 1);
        if self.reads.get() == 1 {
            return Err(KvError::Unavailable("database is locked".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.inner.remove(key)
    }
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 25).unwrap()
}

#[test]
fn seeding_twice_leaves_stored_bytes_identical() {
    let store = RecordStore::new(MemoryKvStore::new());
    store.seed_if_absent(|| generate_days(start(), 380));
    let first = store.backend().get(JOURNEY_PROGRESS_KEY).unwrap().unwrap();

    let again = store.seed_if_absent(|| generate_days(start(), 10));
    let second = store.backend().get(JOURNEY_PROGRESS_KEY).unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(again.persistence, Persistence::Unchanged);
    assert_eq!(again.value.len(), 381);
    assert_eq!(store.backend().write_count(), 1);
}

#[test]
fn progress_is_stored_as_camel_case_json_array() {
    let store = RecordStore::new(MemoryKvStore::new());
    store.seed_if_absent(|| generate_days(start(), 1));
    let raw = store.backend().get(JOURNEY_PROGRESS_KEY).unwrap().unwrap();
    assert_eq!(
        raw,
        r#"[{"date":"2025-05-25","completed":false},{"date":"2025-05-26","completed":false}]"#
    );
}

#[test]
fn malformed_value_is_treated_as_absent_and_reseeded() {
    let backend = MemoryKvStore::new();
    backend.set(JOURNAL_ENTRIES_KEY, "{\"oops\":").unwrap();
    let store = RecordStore::new(backend);

    assert!(matches!(
        store.try_load::<JournalEntries>(),
        Err(StoreError::MalformedPersistedData { ref key, .. }) if key == JOURNAL_ENTRIES_KEY
    ));

    let seeded = store.seed_if_absent(JournalEntries::default);
    assert!(seeded.value.is_empty());
    assert_eq!(seeded.persistence, Persistence::Saved);
    assert_eq!(
        store.backend().get(JOURNAL_ENTRIES_KEY).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn wrong_shape_is_malformed_too() {
    let backend = MemoryKvStore::new();
    backend
        .set(JOURNEY_PROGRESS_KEY, r#"[{"date":"not-a-date","completed":false}]"#)
        .unwrap();
    let store = RecordStore::new(backend);
    assert_eq!(store.load::<JourneyProgress>(), None);
}

#[test]
fn quota_exceeded_keeps_value_in_memory() {
    let store = RecordStore::new(MemoryKvStore::with_quota(64));
    let seeded = store.seed_if_absent(|| generate_days(start(), 380));

    assert_eq!(seeded.value.len(), 381);
    assert!(matches!(
        seeded.persistence.error(),
        Some(StoreError::StorageUnavailable(KvError::QuotaExceeded { limit: 64, .. }))
    ));
    assert_eq!(store.backend().get(JOURNEY_PROGRESS_KEY).unwrap(), None);
}

#[test]
fn unavailable_storage_degrades_to_memory_only() {
    let backend = MemoryKvStore::new();
    backend.set_available(false);
    let store = RecordStore::new(backend);

    let seeded = store.seed_if_absent(|| Locale::En);
    assert_eq!(seeded.value, Locale::En);
    assert!(seeded.persistence.is_memory_only());

    store.backend().set_available(true);
    assert_eq!(store.backend().get(LOCALE_KEY).unwrap(), None);
}

#[test]
fn locale_preference_is_stored_as_json_string_under_i18next_key() {
    let store = RecordStore::new(MemoryKvStore::new());
    store.save(&Locale::En).unwrap();
    assert_eq!(store.backend().keys(), vec![LOCALE_KEY.to_string()]);
    assert_eq!(
        store.backend().get("i18nextLng").unwrap().as_deref(),
        Some("\"en\"")
    );
    assert_eq!(store.load::<Locale>(), Some(Locale::En));
}

#[test]
fn failed_read_never_overwrites_existing_journal() {
    let inner = MemoryKvStore::new();
    let existing = JournalEntries(vec![JournalEntry {
        id: "kept".to_string(),
        title: "Hajj".to_string(),
        content: "Plan the trip".to_string(),
        date: start(),
        category: Category::Goal,
        color: "#0abab5".to_string(),
    }]);
    inner
        .set(JOURNAL_ENTRIES_KEY, &serde_json::to_string(&existing).unwrap())
        .unwrap();
    let stored = inner.get(JOURNAL_ENTRIES_KEY).unwrap();
    let store = RecordStore::new(LockedOnFirstRead {
        inner,
        reads: Cell::new(0),
    });

    let seeded = store.seed_if_absent(JournalEntries::default);
    assert!(seeded.value.is_empty());
    assert!(matches!(
        seeded.persistence.error(),
        Some(StoreError::StorageUnavailable(KvError::Unavailable(_)))
    ));
    assert_eq!(store.backend().inner.get(JOURNAL_ENTRIES_KEY).unwrap(), stored);
    assert_eq!(store.backend().inner.write_count(), 1);

    let reloaded = store.seed_if_absent(JournalEntries::default);
    assert_eq!(reloaded.value, existing);
    assert_eq!(reloaded.persistence, Persistence::Unchanged);
}
