//! Document repository
//!
//! A uniform async key/value interface over the record store. Callers never
//! see connection pools, schema upgrades or cursors; every operation returns a
//! result or a [`StoreError`].

pub mod errors;
pub mod memory_store;
pub mod migrations;
pub mod sql_store;

pub use errors::{StoreError, StoreResult};
pub use memory_store::MemoryDocumentStore;
pub use migrations::{migrate, CURRENT_DOCS_SCHEMA_VERSION};
pub use sql_store::SqliteDocumentStore;

use crate::model::{DocKey, Document};
use async_trait::async_trait;

/// Durable key/value repository for document records
///
/// Implementations must ensure:
/// - `set` replaces the whole record (no merging at this layer)
/// - `delete` of an absent key succeeds
/// - `list` returns keys and values from one consistent read, in insertion
///   order; re-setting a key keeps its position
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a record, `None` if the key is absent
    async fn get(&self, key: &DocKey) -> StoreResult<Option<Document>>;

    /// Overwrite the full record stored under `key`
    async fn set(&self, key: &DocKey, doc: Document) -> StoreResult<()>;

    /// Remove a record
    async fn delete(&self, key: &DocKey) -> StoreResult<()>;

    /// All records in insertion order
    async fn list(&self) -> StoreResult<Vec<(DocKey, Document)>>;
}
