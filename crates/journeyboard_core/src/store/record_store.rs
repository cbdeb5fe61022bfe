//! Typed load/seed/mutate/persist cycle over a `KvStore`.
//!
//! # Responsibility
//! - Map each collection type to its fixed storage key.
//! - Seed a default exactly once, the first time a key is observed absent.
//! - Persist whole collections and report, never raise, backend failures.
//!
//! # Invariants
//! - `seed_if_absent` never overwrites a value that deserializes, even an
//!   empty one, and never writes when the backend cannot be read.
//! - Returned values always equal what the caller should hold in memory,
//!   whether or not the write reached storage.

use super::kv::{KvError, KvStore};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A record collection persisted as one JSON value under `KEY`.
pub trait Collection: Serialize + DeserializeOwned {
    const KEY: &'static str;
}

/// Non-fatal persistence failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Quota exceeded or storage disabled; state is memory-only.
    StorageUnavailable(KvError),
    /// Stored text does not decode as the collection type.
    MalformedPersistedData { key: String, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "{err}"),
            Self::MalformedPersistedData { key, message } => {
                write!(f, "malformed persisted data at `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            Self::MalformedPersistedData { .. } => None,
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::StorageUnavailable(value)
    }
}

/// What happened to storage during an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// The whole value was written.
    Saved,
    /// Nothing was written (value loaded, or the operation was a no-op).
    Unchanged,
    /// The write failed; the returned value lives in memory only.
    MemoryOnly(StoreError),
}

impl Persistence {
    pub fn is_memory_only(&self) -> bool {
        matches!(self, Self::MemoryOnly(_))
    }

    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Self::MemoryOnly(err) => Some(err),
            _ => None,
        }
    }

    fn from_write(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::Saved,
            Err(err) => Self::MemoryOnly(err),
        }
    }
}

/// A value paired with the persistence outcome that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub value: T,
    pub persistence: Persistence,
}

impl<T> Synced<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Synced<U> {
        Synced {
            value: f(self.value),
            persistence: self.persistence,
        }
    }
}

/// Typed collection access over a key-value backend.
#[derive(Debug, Clone)]
pub struct RecordStore<S> {
    backend: S,
}

impl<S: KvStore> RecordStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Loads `C`, treating missing, unreadable and malformed values as absent.
    pub fn load<C: Collection>(&self) -> Option<C> {
        match self.try_load::<C>() {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_load module=store key={} status=absent reason={}",
                    C::KEY,
                    err
                );
                None
            }
        }
    }

    /// Loads `C`, distinguishing "absent" from the reason it is unusable.
    pub fn try_load<C: Collection>(&self) -> Result<Option<C>, StoreError> {
        let Some(raw) = self.backend.get(C::KEY)? else {
            debug!("event=store_load module=store key={} status=missing", C::KEY);
            return Ok(None);
        };
        serde_json::from_str::<C>(&raw)
            .map(Some)
            .map_err(|err| StoreError::MalformedPersistedData {
                key: C::KEY.to_string(),
                message: err.to_string(),
            })
    }

    /// Returns the persisted `C`, or seeds it from `factory` when absent.
    ///
    /// `factory` runs on the seed path and when the backend cannot be read.
    /// A seeded value is written immediately. A loaded value, or a default
    /// standing in for an unreadable backend, is returned with no write.
    pub fn seed_if_absent<C: Collection>(&self, factory: impl FnOnce() -> C) -> Synced<C> {
        match self.try_load::<C>() {
            Ok(Some(value)) => {
                return Synced {
                    value,
                    persistence: Persistence::Unchanged,
                }
            }
            Ok(None) => {}
            Err(err @ StoreError::MalformedPersistedData { .. }) => {
                warn!(
                    "event=store_load module=store key={} status=absent reason={}",
                    C::KEY,
                    err
                );
            }
            Err(err @ StoreError::StorageUnavailable(_)) => {
                warn!(
                    "event=store_seed module=store key={} status=memory_only reason=read_failed error={}",
                    C::KEY,
                    err
                );
                return Synced {
                    value: factory(),
                    persistence: Persistence::MemoryOnly(err),
                };
            }
        }

        let value = factory();
        let persistence = Persistence::from_write(self.save(&value));
        match &persistence {
            Persistence::MemoryOnly(err) => warn!(
                "event=store_seed module=store key={} status=memory_only error={}",
                C::KEY,
                err
            ),
            _ => info!("event=store_seed module=store key={} status=ok", C::KEY),
        }
        Synced { value, persistence }
    }

    /// Serializes `value` and overwrites the whole entry at `C::KEY`.
    pub fn save<C: Collection>(&self, value: &C) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|err| {
            StoreError::StorageUnavailable(KvError::Unavailable(format!(
                "failed to encode `{}`: {err}",
                C::KEY
            )))
        })?;
        self.backend.set(C::KEY, &raw)?;
        debug!(
            "event=store_save module=store key={} status=ok bytes={}",
            C::KEY,
            raw.len()
        );
        Ok(())
    }

    /// Applies `transform` to `current`, persists the result and returns it.
    pub fn mutate<C: Collection>(&self, current: &C, transform: impl FnOnce(&C) -> C) -> Synced<C> {
        let value = transform(current);
        let persistence = Persistence::from_write(self.save(&value));
        if let Persistence::MemoryOnly(err) = &persistence {
            warn!(
                "event=store_mutate module=store key={} status=memory_only error={}",
                C::KEY,
                err
            );
        }
        Synced { value, persistence }
    }

    /// Removes the entry so the next `seed_if_absent` reseeds.
    pub fn clear<C: Collection>(&self) -> Result<(), StoreError> {
        self.backend.remove(C::KEY)?;
        info!("event=store_clear module=store key={} status=ok", C::KEY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, Persistence, RecordStore, StoreError};
    use crate::store::kv::{KvError, KvResult, KvStore, MemoryKvStore};
    use serde::{Deserialize, Serialize};
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(transparent)]
    struct Counters(Vec<u32>);

    impl Collection for Counters {
        const KEY: &'static str = "counters";
    }

    #[test]
    fn seed_runs_factory_only_when_absent() {
        let store = RecordStore::new(MemoryKvStore::new());
        let first = store.seed_if_absent(|| Counters(vec![1, 2]));
        assert_eq!(first.persistence, Persistence::Saved);

        let second = store.seed_if_absent(|| -> Counters { panic!("must not reseed") });
        assert_eq!(second.value, Counters(vec![1, 2]));
        assert_eq!(second.persistence, Persistence::Unchanged);
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn empty_collection_blocks_reseed() {
        let store = RecordStore::new(MemoryKvStore::new());
        store.save(&Counters(Vec::new())).unwrap();
        let seeded = store.seed_if_absent(|| Counters(vec![9]));
        assert_eq!(seeded.value, Counters(Vec::new()));
    }

    #[test]
    fn malformed_value_is_absent_and_reseeded() {
        let store = RecordStore::new(MemoryKvStore::new());
        store.backend().set("counters", "{not json").unwrap();

        assert!(matches!(
            store.try_load::<Counters>(),
            Err(StoreError::MalformedPersistedData { .. })
        ));
        assert_eq!(store.load::<Counters>(), None);

        let seeded = store.seed_if_absent(|| Counters(vec![3]));
        assert_eq!(seeded.persistence, Persistence::Saved);
        assert_eq!(
            store.backend().get("counters").unwrap().as_deref(),
            Some("[3]")
        );
    }

    #[test]
    fn mutate_returns_new_value_even_when_storage_fails() {
        let store = RecordStore::new(MemoryKvStore::new());
        let current = store.seed_if_absent(|| Counters(vec![1])).into_value();
        store.backend().set_available(false);

        let next = store.mutate(&current, |c| {
            let mut values = c.0.clone();
            values.push(2);
            Counters(values)
        });
        assert_eq!(next.value, Counters(vec![1, 2]));
        assert!(next.persistence.is_memory_only());
        assert!(matches!(
            next.persistence.error(),
            Some(StoreError::StorageUnavailable(_))
        ));
    }

    struct FailingReads {
        inner: MemoryKvStore,
        failed: Cell<bool>,
    }

    impl KvStore for FailingReads {
        fn get(&self, key: &str) -> KvResult<Option<String>> {
            if !self.failed.replace(true) {
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

    #[test]
    fn failed_read_serves_default_without_overwriting_stored_value() {
        let inner = MemoryKvStore::new();
        inner.set("counters", "[4,5]").unwrap();
        let store = RecordStore::new(FailingReads {
            inner,
            failed: Cell::new(false),
        });

        let seeded = store.seed_if_absent(|| Counters(Vec::new()));
        assert_eq!(seeded.value, Counters(Vec::new()));
        assert!(matches!(
            seeded.persistence,
            Persistence::MemoryOnly(StoreError::StorageUnavailable(KvError::Unavailable(_)))
        ));
        assert_eq!(store.backend().inner.write_count(), 1);
        assert_eq!(
            store.backend().inner.get("counters").unwrap().as_deref(),
            Some("[4,5]")
        );

        let recovered = store.seed_if_absent(|| -> Counters { panic!("must not reseed") });
        assert_eq!(recovered.value, Counters(vec![4, 5]));
        assert_eq!(recovered.persistence, Persistence::Unchanged);
    }

    #[test]
    fn clear_forces_next_seed() {
        let store = RecordStore::new(MemoryKvStore::new());
        store.seed_if_absent(|| Counters(vec![1]));
        store.clear::<Counters>().unwrap();
        let reseeded = store.seed_if_absent(|| Counters(vec![7]));
        assert_eq!(reseeded.value, Counters(vec![7]));
    }
}
