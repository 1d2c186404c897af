//! Access-checked JSON envelope
//!
//! Seals the file together with its access descriptor and metadata the way
//! conditional-encryption networks package their zips, and refuses to open
//! the envelope for callers the descriptor does not permit. The payload is
//! NOT encrypted; this exists to exercise the flows offline.

use crate::access::AccessDescriptor;
use crate::lifecycle::{LifecycleError, LifecycleResult};
use crate::model::{Document, FileBlob};
use crate::services::{AuthSignature, DecryptedPayload, EncryptedBlob, EncryptionService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ENVELOPE_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u8,
    access: AccessDescriptor,
    encrypted_by: String,
    metadata: Map<String, Value>,
    file: FileBlob,
}

/// Envelope "cipher" acting on behalf of one address
#[derive(Debug, Clone)]
pub struct EnvelopeCipher {
    address: String,
}

impl EnvelopeCipher {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl EncryptionService for EnvelopeCipher {
    async fn encrypt(
        &self,
        address: &str,
        document: &Document,
        descriptor: &AccessDescriptor,
    ) -> LifecycleResult<EncryptedBlob> {
        let file = document.file.clone().ok_or_else(|| {
            LifecycleError::EncryptionFailure("document has no file to encrypt".to_string())
        })?;

        let mut metadata = Map::new();
        metadata.insert("name".into(), Value::String(file.name.clone()));
        metadata.insert("type".into(), Value::String(file.mime_type.clone()));
        metadata.insert("size".into(), Value::from(file.len() as u64));
        if let Some(sign_name) = &document.sign_name {
            metadata.insert("signName".into(), Value::String(sign_name.clone()));
        }

        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            access: descriptor.clone(),
            encrypted_by: address.to_string(),
            metadata,
            file,
        };

        Ok(EncryptedBlob::new(serde_json::to_vec(&envelope)?))
    }

    async fn authenticate(&self, chain: &str) -> LifecycleResult<AuthSignature> {
        let signed_message = format!("web3sign: {} requests decryption on {}", self.address, chain);
        let sig = blake3::hash(signed_message.as_bytes());

        Ok(AuthSignature {
            address: self.address.clone(),
            chain: chain.to_string(),
            signed_message,
            sig: format!("0x{}", hex::encode(sig.as_bytes())),
        })
    }

    async fn decrypt(&self, blob: &[u8], auth: &AuthSignature) -> LifecycleResult<DecryptedPayload> {
        let envelope: Envelope = serde_json::from_slice(blob)?;

        if envelope.version != ENVELOPE_VERSION {
            return Err(LifecycleError::EncryptionFailure(format!(
                "unsupported envelope version {}",
                envelope.version
            )));
        }

        if !envelope.access.permits(&auth.address) {
            return Err(LifecycleError::EncryptionFailure(format!(
                "access conditions not met for {}",
                auth.address
            )));
        }

        Ok(DecryptedPayload {
            bytes: envelope.file.bytes,
            metadata: envelope.metadata,
        })
    }
}
