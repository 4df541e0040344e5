//! SQLite-backed cache of raw tracker responses.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from the response cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Lock poisoned")]
    Poisoned,
}

impl From<CacheError> for super::ClientError {
    fn from(e: CacheError) -> Self {
        super::ClientError::Cache(e.to_string())
    }
}

/// Store of successful response bodies keyed by request.
pub trait ResponseCache: Send + Sync {
    /// Body for `key`, if present and not expired.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `body` under `key`, replacing any earlier entry.
    fn put(&self, key: &str, body: &str) -> Result<(), CacheError>;
}

/// Cache key for one request: SHA-256 over the action and its sorted parameters.
pub fn cache_key(action: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort();

    let mut hasher = Sha256::new();
    hasher.update(action.as_bytes());
    for (name, value) in sorted {
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// SQLite response cache with a fixed time-to-live.
pub struct SqliteResponseCache {
    conn: Mutex<Connection>,
    ttl: Duration,
}

impl SqliteResponseCache {
    /// Open or create the cache database at `path`.
    pub fn new(path: &Path, ttl: Duration) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
        })
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory(ttl: Duration) -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                stored_at INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    /// Delete expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.execute(
            "DELETE FROM responses WHERE stored_at < ?",
            params![self.cutoff()],
        )
        .map_err(|e| CacheError::Database(e.to_string()))
    }

    fn cutoff(&self) -> i64 {
        Utc::now().timestamp() - self.ttl.as_secs() as i64
    }
}

impl ResponseCache for SqliteResponseCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.query_row(
            "SELECT body FROM responses WHERE key = ? AND stored_at >= ?",
            params![key, self.cutoff()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CacheError::Database(e.to_string()))
    }

    fn put(&self, key: &str, body: &str) -> Result<(), CacheError> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO responses (key, body, stored_at) VALUES (?, ?, ?)",
            params![key, body, Utc::now().timestamp()],
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(())
    }
}
