//! Document signing and signature stamping

use crate::lifecycle::LifecycleResult;
use crate::model::{Document, FileBlob};
use async_trait::async_trait;

/// Produces a signature over a whole document record
#[async_trait]
pub trait SignatureService: Send + Sync {
    async fn sign(&self, document: &Document) -> LifecycleResult<String>;
}

/// Writes the signer's name onto the file itself (e.g. a PDF annotation)
#[async_trait]
pub trait SignatureStamper: Send + Sync {
    async fn stamp(&self, file: &FileBlob, sign_name: &str) -> LifecycleResult<FileBlob>;
}
