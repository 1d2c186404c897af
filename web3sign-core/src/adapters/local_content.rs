//! Local content-addressed blob store
//!
//! Content ids are `b3` followed by the hex blake3 digest of the blob, so
//! uploading the same bytes twice yields the same id.

use crate::lifecycle::{LifecycleError, LifecycleResult};
use crate::model::RemoteReference;
use crate::services::{ContentStorage, EncryptedBlob};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Provider name recorded on upload receipts
pub const LOCAL_PROVIDER: &str = "local";

/// Content-addressed store held in memory or in a directory
#[derive(Clone, Default)]
pub struct LocalContentStore {
    root: Option<PathBuf>,
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl LocalContentStore {
    /// Store that forgets everything when dropped
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store that writes one file per content id under `root`
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            blobs: Arc::default(),
        }
    }

    /// Content id for a blob
    pub fn content_id(bytes: &[u8]) -> String {
        format!("b3{}", blake3::hash(bytes).to_hex())
    }

    fn is_valid_content_id(content_id: &str) -> bool {
        content_id.len() == 66
            && content_id.starts_with("b3")
            && content_id[2..].bytes().all(|b| b.is_ascii_hexdigit())
    }
}

#[async_trait]
impl ContentStorage for LocalContentStore {
    async fn upload(&self, api_key: &str, blob: &EncryptedBlob) -> LifecycleResult<RemoteReference> {
        if api_key.trim().is_empty() {
            return Err(LifecycleError::NetworkFailure(
                "upload rejected: missing API key".to_string(),
            ));
        }

        let content_id = Self::content_id(&blob.bytes);

        match &self.root {
            Some(root) => {
                tokio::fs::create_dir_all(root)
                    .await
                    .map_err(|e| LifecycleError::NetworkFailure(e.to_string()))?;
                tokio::fs::write(root.join(&content_id), &blob.bytes)
                    .await
                    .map_err(|e| LifecycleError::NetworkFailure(e.to_string()))?;
            }
            None => {
                self.blobs
                    .write()
                    .await
                    .insert(content_id.clone(), blob.bytes.clone());
            }
        }

        debug!(content_id = %content_id, size = blob.len(), "Stored blob");
        Ok(RemoteReference::new(content_id, blob.len() as u64, LOCAL_PROVIDER))
    }

    async fn fetch(&self, content_id: &str) -> LifecycleResult<Vec<u8>> {
        if !Self::is_valid_content_id(content_id) {
            return Err(LifecycleError::NetworkFailure(format!(
                "invalid content id: {}",
                content_id
            )));
        }

        let not_found = || LifecycleError::NetworkFailure(format!("content not found: {}", content_id));

        match &self.root {
            Some(root) => match tokio::fs::read(root.join(content_id)).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
                Err(e) => Err(LifecycleError::NetworkFailure(e.to_string())),
            },
            None => self.blobs.read().await.get(content_id).cloned().ok_or_else(not_found),
        }
    }
}
