//! Local persistence for typed record collections.
//!
//! # Responsibility
//! - Abstract the key-value backend (`KvStore`) behind one narrow trait.
//! - Give each feature a typed collection with exactly one reseed path
//!   (`RecordStore::seed_if_absent`).
//!
//! # Invariants
//! - Every write replaces the whole value at a key; there are no patches.
//! - Malformed persisted content is treated as absent, never as a fault.
//! - Backend failures degrade to memory-only state; they never panic.

pub mod kv;
pub mod record_store;
pub mod sqlite;

pub use kv::{KvError, KvResult, KvStore, MemoryKvStore};
pub use record_store::{Collection, Persistence, RecordStore, StoreError, Synced};
pub use sqlite::SqliteKvStore;
