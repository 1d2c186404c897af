//! Conditional encryption service

use crate::access::AccessDescriptor;
use crate::lifecycle::LifecycleResult;
use crate::model::Document;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque ciphertext ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub bytes: Vec<u8>,
}

impl EncryptedBlob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Proof that the holder of `address` is asking to decrypt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSignature {
    pub address: String,
    pub chain: String,
    pub signed_message: String,
    pub sig: String,
}

/// Plaintext and the metadata that was sealed next to it
#[derive(Debug, Clone, PartialEq)]
pub struct DecryptedPayload {
    pub bytes: Vec<u8>,
    pub metadata: Map<String, Value>,
}

/// Encrypts documents under an access descriptor and decrypts them for
/// callers that satisfy it
///
/// The descriptor travels inside the encrypted blob, so decryption is
/// authorized by an [`AuthSignature`] checked against it.
#[async_trait]
pub trait EncryptionService: Send + Sync {
    /// Encrypt the document's file for `address` under `descriptor`
    async fn encrypt(
        &self,
        address: &str,
        document: &Document,
        descriptor: &AccessDescriptor,
    ) -> LifecycleResult<EncryptedBlob>;

    /// Obtain an auth signature for decrypting on `chain`
    async fn authenticate(&self, chain: &str) -> LifecycleResult<AuthSignature>;

    /// Decrypt a fetched blob
    async fn decrypt(&self, blob: &[u8], auth: &AuthSignature) -> LifecycleResult<DecryptedPayload>;
}
