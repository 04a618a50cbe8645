use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::OptionalExtension;
use tracing::debug;

use crate::error::{LedgerError, Result};

/// Per-key durable storage the ledger is built on. Each call touches exactly
/// one key and is atomic for that key; nothing spans keys.
pub trait KeyValueStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put_state(&self, key: &str, value: &[u8]) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| LedgerError::Store("state lock poisoned".to_string()))
}

/// World state kept in a single sqlite table, one row per key.
#[derive(Clone)]
pub struct SqliteState {
    pub ctx: Arc<Mutex<rusqlite::Connection>>,
}

impl SqliteState {
    pub fn new(ctx: rusqlite::Connection) -> Result<Self> {
        ctx.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS world_state(key TEXT PRIMARY KEY, value BLOB NOT NULL);
            COMMIT;",
        )?;
        Ok(Self {
            ctx: Arc::new(Mutex::new(ctx)),
        })
    }

    pub fn open(path: &std::path::Path) -> Result<Self> {
        Self::new(rusqlite::Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(rusqlite::Connection::open_in_memory()?)
    }
}

impl KeyValueStore for SqliteState {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cnx = lock(&self.ctx)?;
        let value: Option<Vec<u8>> = cnx
            .query_row(
                "SELECT value FROM world_state WHERE key=?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        debug!(key, found = value.is_some(), "get_state");
        Ok(value)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        let cnx = lock(&self.ctx)?;
        cnx.execute(
            "INSERT INTO world_state(key, value) VALUES(?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value=excluded.value;",
            rusqlite::params![key, value],
        )?;
        debug!(key, bytes = value.len(), "put_state");
        Ok(())
    }
}

/// In-process world state.
#[derive(Default)]
pub struct MemoryState {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryState {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(lock(&self.values)?.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        lock(&self.values)?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
