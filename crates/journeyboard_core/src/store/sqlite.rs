//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Values live in `kv_entries`, one row per key, replaced on every write.
//! - SQLite failures surface as `KvError::Unavailable`, never as panics.

use super::kv::{KvError, KvResult, KvStore};
use crate::db::{open_db, open_db_in_memory, DbResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable `KvStore` over one SQLite connection.
pub struct SqliteKvStore {
    conn: Connection,
    quota_bytes: Option<usize>,
}

impl SqliteKvStore {
    /// Opens (or creates) the database file and applies migrations.
    pub fn open(path: impl AsRef<Path>, quota_bytes: Option<usize>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
            quota_bytes,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            quota_bytes: None,
        })
    }

    /// Wraps a connection that already has migrations applied.
    pub fn from_connection(conn: Connection, quota_bytes: Option<usize>) -> Self {
        Self { conn, quota_bytes }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| unavailable("get", key, err))
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        if let Some(limit) = self.quota_bytes {
            if value.len() > limit {
                return Err(KvError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                    limit,
                });
            }
        }

        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|err| unavailable("set", key, err))
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])
            .map(|_| ())
            .map_err(|err| unavailable("remove", key, err))
    }
}

fn unavailable(op: &str, key: &str, err: rusqlite::Error) -> KvError {
    warn!("event=kv_{op} module=store status=error key={key} error={err}");
    KvError::Unavailable(err.to_string())
}
