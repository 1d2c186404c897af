//! Digest-based signer

use crate::lifecycle::LifecycleResult;
use crate::model::Document;
use crate::services::SignatureService;
use async_trait::async_trait;

/// "Signs" a document with a blake3 digest over the signer address and the
/// serialized record
///
/// Deterministic: the same signer and document always give the same value.
#[derive(Debug, Clone)]
pub struct DigestSigner {
    address: String,
}

impl DigestSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl SignatureService for DigestSigner {
    async fn sign(&self, document: &Document) -> LifecycleResult<String> {
        let encoded = serde_json::to_vec(document)?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.address.as_bytes());
        hasher.update(&encoded);

        Ok(format!("0x{}", hex::encode(hasher.finalize().as_bytes())))
    }
}
