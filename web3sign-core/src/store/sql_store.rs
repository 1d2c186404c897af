//! SQLite-backed document store
//!
//! Records live in a single `docs` table as JSON text. Connections come from
//! an r2d2 pool and every query runs on the blocking thread pool so the async
//! callers never stall the runtime.

use super::errors::{StoreError, StoreResult};
use super::migrations::{migrate, now_millis};
use super::DocumentStore;
use crate::model::{DocKey, Document};
use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default pool size for file-backed stores
const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Default time a writer waits on a locked database
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed document store
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteDocumentStore {
    /// Open (or create) the database at `db_path` and run migrations
    ///
    /// Failures are returned, not just logged: a store that cannot open is
    /// unusable.
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        Self::open_with(db_path, DEFAULT_MAX_CONNECTIONS, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open with explicit pool size and busy timeout
    pub fn open_with<P: AsRef<Path>>(
        db_path: P,
        max_connections: u32,
        busy_timeout: Duration,
    ) -> StoreResult<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!(
                    "Failed to create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        debug!(path = %path.display(), "Opening document database");
        Self::from_manager(
            SqliteConnectionManager::file(path),
            max_connections,
            busy_timeout,
        )
    }

    /// A private in-memory database
    ///
    /// The pool holds a single connection, since every SQLite in-memory
    /// connection is its own database.
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_manager(SqliteConnectionManager::memory(), 1, DEFAULT_BUSY_TIMEOUT)
    }

    fn from_manager(
        manager: SqliteConnectionManager,
        max_connections: u32,
        busy_timeout: Duration,
    ) -> StoreResult<Self> {
        let manager = manager.with_init(move |conn| conn.busy_timeout(busy_timeout));
        let pool = Pool::builder()
            .max_size(max_connections.max(1))
            .build(manager)
            .map_err(|e| {
                StoreError::Unavailable(format!("Failed to create connection pool: {}", e))
            })?;

        migrate(&pool)?;

        Ok(Self { pool })
    }

    /// Run `f` against a pooled connection on the blocking thread pool
    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&*conn)
        })
        .await?
    }
}

fn decode(key: &str, json: &str) -> StoreResult<Document> {
    serde_json::from_str(json).map_err(|e| StoreError::Corrupted {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn encode(doc: &Document) -> StoreResult<String> {
    serde_json::to_string(doc)
        .map_err(|e| StoreError::Unavailable(format!("Failed to serialize document: {}", e)))
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, key: &DocKey) -> StoreResult<Option<Document>> {
        let key = key.as_str().to_string();

        self.run(move |conn| {
            let json: Option<String> = conn
                .query_row("SELECT doc FROM docs WHERE key = ?", params![&key], |row| {
                    row.get(0)
                })
                .optional()?;

            json.map(|json| decode(&key, &json)).transpose()
        })
        .await
    }

    async fn set(&self, key: &DocKey, doc: Document) -> StoreResult<()> {
        let key = key.as_str().to_string();
        let json = encode(&doc)?;

        self.run(move |conn| {
            conn.execute(
                r#"
                INSERT INTO docs (key, doc, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    doc = excluded.doc,
                    updated_at = excluded.updated_at
                "#,
                params![&key, &json, now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &DocKey) -> StoreResult<()> {
        let key = key.as_str().to_string();

        self.run(move |conn| {
            conn.execute("DELETE FROM docs WHERE key = ?", params![&key])?;
            Ok(())
        })
        .await
    }

    async fn list(&self) -> StoreResult<Vec<(DocKey, Document)>> {
        // One statement, so keys and values come from the same read
        self.run(|conn| {
            let mut stmt = conn.prepare("SELECT key, doc FROM docs ORDER BY seq")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(key, json)| {
                    let doc = decode(&key, &json)?;
                    Ok((DocKey(key), doc))
                })
                .collect()
        })
        .await
    }
}
