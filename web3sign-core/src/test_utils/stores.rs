//! Instrumented document stores

use crate::model::{DocKey, Document};
use crate::store::{DocumentStore, MemoryDocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Store whose reads pause after fetching the value
///
/// Widens the gap between the read and the write of a merge so concurrent
/// merges reliably interleave.
#[derive(Default)]
pub struct SlowStore {
    inner: MemoryDocumentStore,
    read_delay: Duration,
}

impl SlowStore {
    pub fn new(read_delay: Duration) -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            read_delay,
        }
    }
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn get(&self, key: &DocKey) -> StoreResult<Option<Document>> {
        let value = self.inner.get(key).await?;
        tokio::time::sleep(self.read_delay).await;
        Ok(value)
    }

    async fn set(&self, key: &DocKey, doc: Document) -> StoreResult<()> {
        self.inner.set(key, doc).await
    }

    async fn delete(&self, key: &DocKey) -> StoreResult<()> {
        self.inner.delete(key).await
    }

    async fn list(&self) -> StoreResult<Vec<(DocKey, Document)>> {
        self.inner.list().await
    }
}

/// Store that starts failing every call once switched off
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryDocumentStore,
    failing: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, key: &DocKey) -> StoreResult<Option<Document>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &DocKey, doc: Document) -> StoreResult<()> {
        self.check()?;
        self.inner.set(key, doc).await
    }

    async fn delete(&self, key: &DocKey) -> StoreResult<()> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn list(&self) -> StoreResult<Vec<(DocKey, Document)>> {
        self.check()?;
        self.inner.list().await
    }
}
