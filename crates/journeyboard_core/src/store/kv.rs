//! Key-value backend contract and the in-process implementation.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type KvResult<T> = Result<T, KvError>;

/// Backend-level failure. Both variants mean "value was not stored".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// Storage disabled, closed or failing.
    Unavailable(String),
    /// Value larger than the backend accepts.
    QuotaExceeded {
        key: String,
        bytes: usize,
        limit: usize,
    },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::QuotaExceeded { key, bytes, limit } => write!(
                f,
                "storage quota exceeded for `{key}`: {bytes} bytes > {limit} bytes"
            ),
        }
    }
}

impl Error for KvError {}

/// String-valued persistent map.
///
/// Single writer per key is assumed; last write wins.
pub trait KvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
    fn remove(&self, key: &str) -> KvResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for Rc<S> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }
}

/// Volatile map with optional quota and an availability switch.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    unavailable: Cell<bool>,
    writes: Cell<u64>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Simulates storage being disabled (`false`) or restored (`true`).
    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.get()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    fn ensure_available(&self) -> KvResult<()> {
        if self.unavailable.get() {
            return Err(KvError::Unavailable("storage is disabled".to_string()));
        }
        Ok(())
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.ensure_available()?;
        if let Some(limit) = self.quota_bytes {
            if value.len() > limit {
                return Err(KvError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                    limit,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.ensure_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KvError, KvStore, MemoryKvStore};
    use std::rc::Rc;

    #[test]
    fn set_overwrites_whole_value() {
        let store = MemoryKvStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn quota_rejects_oversized_values_and_keeps_previous() {
        let store = MemoryKvStore::with_quota(4);
        store.set("k", "abcd").unwrap();
        let err = store.set("k", "abcde").unwrap_err();
        assert!(matches!(err, KvError::QuotaExceeded { bytes: 5, limit: 4, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("abcd"));
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = MemoryKvStore::new();
        store.set_available(false);
        assert!(matches!(store.get("k"), Err(KvError::Unavailable(_))));
        assert!(store.set("k", "v").is_err());
        store.set_available(true);
        assert!(store.set("k", "v").is_ok());
    }

    #[test]
    fn shared_handles_see_the_same_entries() {
        let store = Rc::new(MemoryKvStore::new());
        let other = Rc::clone(&store);
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert_eq!(store.keys(), Vec::<String>::new());
    }
}
