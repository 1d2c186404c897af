//! In-memory document store
//!
//! Insertion-ordered map behind an async lock. Used by tests and by the CLI
//! when no database path is configured.

use super::{DocumentStore, StoreResult};
use crate::model::{DocKey, Document};
use async_trait::async_trait;
use hashlink::LinkedHashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory document store
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    docs: Arc<RwLock<LinkedHashMap<DocKey, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &DocKey) -> StoreResult<Option<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.get(key).cloned())
    }

    async fn set(&self, key: &DocKey, doc: Document) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        // Overwrite in place so the key keeps its insertion slot
        match docs.get_mut(key) {
            Some(slot) => *slot = doc,
            None => {
                docs.insert(key.clone(), doc);
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &DocKey) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        docs.remove(key);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<(DocKey, Document)>> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .map(|(key, doc)| (key.clone(), doc.clone()))
            .collect())
    }
}
