//! Local key-value store backed by a single SQLite table.

use super::{StorageError, StorageProvider, StorageResult};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);";

/// Local key-value storage.
///
/// Each logical key maps to one row holding the value's compact JSON
/// encoding. Always permitted; `init` has nothing to do.
pub struct KeyValueProvider {
    conn: Connection,
    path: Option<PathBuf>,
}

impl KeyValueProvider {
    /// Opens or creates the store at `path`, creating parent directories.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self { conn, path: None })
    }

    /// Returns the raw string stored under `key`.
    pub fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Stores a raw string under `key` without encoding it.
    pub fn put_raw(&self, key: &str, raw: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }
}

impl StorageProvider for KeyValueProvider {
    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("local store {}", path.display()),
            None => "in-memory store".to_string(),
        }
    }

    fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    fn read_value(&self, key: &str) -> StorageResult<Option<Value>> {
        match self.get_raw(key)? {
            Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Json {
                    key: key.to_string(),
                    source: e,
                }),
            _ => Ok(None),
        }
    }

    fn write_value(&self, key: &str, value: &Value) -> StorageResult<()> {
        self.put_raw(key, &value.to_string())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn has_permission(&self) -> StorageResult<bool> {
        Ok(true)
    }

    fn request_permission(&self) -> StorageResult<bool> {
        Ok(true)
    }
}
