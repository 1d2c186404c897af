//! References to content held by the remote storage provider

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Receipt returned by the content-addressed storage provider after upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReference {
    /// Content identifier used to fetch the blob later
    pub content_id: String,

    /// Size of the uploaded blob in bytes
    pub size: u64,

    /// Name the provider recorded for the upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Provider that holds the content
    #[serde(default)]
    pub provider: String,
}

impl RemoteReference {
    pub fn new(content_id: impl Into<String>, size: u64, provider: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            size,
            name: None,
            provider: provider.into(),
        }
    }
}

/// Metadata recovered from a decrypted blob, tagged with the content id it
/// came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedMetadata {
    /// Content identifier the plaintext was fetched from
    pub cid: String,

    /// Whatever the encryption service embedded next to the ciphertext
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RetrievedMetadata {
    /// Attach a content id to decrypted metadata
    ///
    /// A `cid` key already present in the metadata is replaced.
    pub fn new(cid: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        fields.remove("cid");
        Self {
            cid: cid.into(),
            fields,
        }
    }

    /// Original filename, if the metadata carries one
    pub fn file_name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// MIME type, if the metadata carries one
    pub fn mime_type(&self) -> Option<&str> {
        self.fields
            .get("type")
            .or_else(|| self.fields.get("mimeType"))
            .and_then(Value::as_str)
    }
}
