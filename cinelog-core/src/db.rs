use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension};

use crate::error::StoreError;
use crate::kv::KvStore;

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// The connection is synchronous on purpose: every write happens on the UI
/// task in response to a discrete user action (login, register, logout), and
/// logout must complete before it returns.
///
/// # Errors
///
/// Returns `StoreError` if the file cannot be opened, WAL configuration fails,
/// or schema DDL fails.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    let mut conn = Connection::open(path)?;

    // WAL pragmas are connection-level settings, re-applied on every open.
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    conn.busy_timeout(Duration::from_secs(5))?;

    crate::schema::migrate(&mut conn)?;
    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// [`KvStore`] backed by the `kv` table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens the database at `path` (see [`open_db`]) and wraps it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self { conn: open_db(path)? })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![key],
                |r| r.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Upserts `key` inside `BEGIN IMMEDIATE`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            rusqlite::params![key, value, now_secs()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }
}
