// ==========================================
// Grain Receiving - Key-Value Store
// ==========================================
// The persistent store is a flat mapping from string keys to JSON
// text. No business logic lives here.
// ==========================================
// Implementations:
// - SqliteKvStore: one `kv_store` table, set_many in one transaction
// - InMemoryKvStore: BTreeMap behind a mutex (tests, dry runs)
// ==========================================

use crate::db::{open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// Trait: KeyValueStore
// ==========================================
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Write a single key.
    fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// Write several keys as one unit: either all of them land or none.
    fn set_many(&self, entries: &[(String, String)]) -> RepositoryResult<()>;

    /// All keys currently present, sorted.
    fn keys(&self) -> RepositoryResult<Vec<String>>;
}

// ==========================================
// SqliteKvStore
// ==========================================
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// Open (or create) the store at `db_path`.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        check_schema_version(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Build from an existing connection; the schema is applied again (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            crate::db::ensure_schema(&guard)?;
            check_schema_version(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

/// Warns when the file was written by a newer build than this one.
fn check_schema_version(conn: &Connection) -> RepositoryResult<Option<i64>> {
    let version = read_schema_version(conn)?;
    if let Some(v) = version {
        if v > CURRENT_SCHEMA_VERSION {
            warn!(
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "store schema is newer than this build"
            );
        }
    }
    Ok(version)
}

const UPSERT_SQL: &str = r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, datetime('now'))
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::StoreTransactionError(e.to_string()))?;

        for (key, value) in entries {
            tx.execute(UPSERT_SQL, params![key, value])
                .map_err(|e| RepositoryError::StoreTransactionError(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::StoreTransactionError(e.to_string()))?;
        Ok(())
    }

    fn keys(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}

// ==========================================
// InMemoryKvStore
// ==========================================
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_entries(&self) -> RepositoryResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.get_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.get_entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> RepositoryResult<()> {
        // single lock hold: readers never observe half of the batch
        let mut map = self.get_entries()?;
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn keys(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.get_entries()?.keys().cloned().collect())
    }
}
