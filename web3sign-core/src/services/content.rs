//! Content-addressed storage provider

use super::encryption::EncryptedBlob;
use crate::lifecycle::LifecycleResult;
use crate::model::RemoteReference;
use async_trait::async_trait;

/// Upload/download transport for encrypted blobs
#[async_trait]
pub trait ContentStorage: Send + Sync {
    /// Upload a blob, authenticating with `api_key`
    async fn upload(&self, api_key: &str, blob: &EncryptedBlob) -> LifecycleResult<RemoteReference>;

    /// Fetch the exact bytes previously uploaded under `content_id`
    async fn fetch(&self, content_id: &str) -> LifecycleResult<Vec<u8>>;
}
