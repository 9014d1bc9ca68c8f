//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Read and replace whole text values under well-known keys.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - `put` replaces any prior value for the key atomically.
//! - `get` never fabricates a value: missing keys are `None`.

use crate::db::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Text storage medium addressed by key.
pub trait KeyValueRepository {
    fn get(&self, key: &str) -> DbResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> DbResult<()>;
    fn delete(&self, key: &str) -> DbResult<bool>;
}

/// SQLite-backed key-value repository over `kv_entries`.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(DbError::from)
    }

    fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> DbResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
