//! Document records and partial updates

use super::file::FileBlob;
use super::remote::{RemoteReference, RetrievedMetadata};
use crate::access::AccessDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key for a document within the store
///
/// Keys are caller-supplied strings. Uploads that do not name a key get a
/// random UUIDv4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocKey(pub String);

impl DocKey {
    pub fn new(key: impl Into<String>) -> Self {
        DocKey(key.into())
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        DocKey(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocKey {
    fn from(s: &str) -> Self {
        DocKey(s.to_string())
    }
}

impl From<String> for DocKey {
    fn from(s: String) -> Self {
        DocKey(s)
    }
}

/// Furthest lifecycle step a document's fields show it has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Draft,
    Signed,
    Encrypted,
    Uploaded,
    Retrieved,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleStage::Draft => "draft",
            LifecycleStage::Signed => "signed",
            LifecycleStage::Encrypted => "encrypted",
            LifecycleStage::Uploaded => "uploaded",
            LifecycleStage::Retrieved => "retrieved",
        };
        write!(f, "{}", s)
    }
}

/// A stored document record
///
/// Every field is optional. Fields accumulate as the lifecycle progresses
/// but no ordering is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// File payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileBlob>,

    /// Signature, present after signing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed: Option<String>,

    /// Name the signer stamps onto the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_name: Option<String>,

    /// Wallet address of the document owner
    #[serde(default, rename = "address", skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,

    /// Access descriptor the payload was encrypted under
    #[serde(
        default,
        rename = "accessDescriptor",
        alias = "encryptionKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub access: Option<AccessDescriptor>,

    /// Upload receipt from the storage provider
    #[serde(
        default,
        rename = "remoteReference",
        alias = "lighthouse",
        skip_serializing_if = "Option::is_none"
    )]
    pub remote: Option<RemoteReference>,

    /// Metadata recovered by the last retrieval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RetrievedMetadata>,
}

impl Document {
    /// A fresh draft holding a file
    pub fn draft(name: Option<String>, file: FileBlob) -> Self {
        Self {
            name,
            file: Some(file),
            ..Default::default()
        }
    }

    /// Shallow merge: every field present in `patch` replaces the stored one
    pub fn apply(&mut self, patch: DocumentPatch) {
        let DocumentPatch {
            name,
            file,
            signed,
            sign_name,
            owner_address,
            access,
            remote,
            metadata,
        } = patch;

        overlay(&mut self.name, name);
        overlay(&mut self.file, file);
        overlay(&mut self.signed, signed);
        overlay(&mut self.sign_name, sign_name);
        overlay(&mut self.owner_address, owner_address);
        overlay(&mut self.access, access);
        overlay(&mut self.remote, remote);
        overlay(&mut self.metadata, metadata);
    }

    /// Consuming variant of [`Document::apply`]
    pub fn merged(mut self, patch: DocumentPatch) -> Self {
        self.apply(patch);
        self
    }

    /// Furthest lifecycle stage the present fields indicate
    pub fn stage(&self) -> LifecycleStage {
        if self.metadata.is_some() {
            LifecycleStage::Retrieved
        } else if self.remote.is_some() {
            LifecycleStage::Uploaded
        } else if self.access.is_some() {
            LifecycleStage::Encrypted
        } else if self.signed.is_some() {
            LifecycleStage::Signed
        } else {
            LifecycleStage::Draft
        }
    }

    /// Name to show for the document, falling back to the filename
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.file.as_ref().map(|f| f.name.as_str()))
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// A partial update to a [`Document`]
///
/// Absent fields leave the stored record untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileBlob>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_name: Option<String>,

    #[serde(default, rename = "address", skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,

    #[serde(
        default,
        rename = "accessDescriptor",
        alias = "encryptionKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub access: Option<AccessDescriptor>,

    #[serde(
        default,
        rename = "remoteReference",
        alias = "lighthouse",
        skip_serializing_if = "Option::is_none"
    )]
    pub remote: Option<RemoteReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RetrievedMetadata>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn file(mut self, file: FileBlob) -> Self {
        self.file = Some(file);
        self
    }

    pub fn signed(mut self, signature: impl Into<String>) -> Self {
        self.signed = Some(signature.into());
        self
    }

    pub fn sign_name(mut self, sign_name: impl Into<String>) -> Self {
        self.sign_name = Some(sign_name.into());
        self
    }

    pub fn owner_address(mut self, address: impl Into<String>) -> Self {
        self.owner_address = Some(address.into());
        self
    }

    pub fn access(mut self, access: AccessDescriptor) -> Self {
        self.access = Some(access);
        self
    }

    pub fn remote(mut self, remote: RemoteReference) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn metadata(mut self, metadata: RetrievedMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whether the patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A keyed document as it appears in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocEntry {
    pub key: DocKey,
    pub doc: Document,
}

impl From<(DocKey, Document)> for DocEntry {
    fn from((key, doc): (DocKey, Document)) -> Self {
        DocEntry { key, doc }
    }
}
