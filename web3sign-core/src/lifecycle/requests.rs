//! Request and result payloads of the lifecycle flows

use crate::model::{DocKey, DocumentPatch, FileBlob, RetrievedMetadata};
use serde::{Deserialize, Serialize};

/// New document; a missing key gets a generated one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<DocKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub file: FileBlob,
}

/// Shallow merge of arbitrary fields into one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRequest {
    pub key: DocKey,
    #[serde(flatten)]
    pub patch: DocumentPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    pub key: DocKey,
}

/// Fields to merge before the record is encrypted and uploaded
///
/// Usually carries `signName` and the owner's `address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignAndUploadRequest {
    pub key: DocKey,
    #[serde(flatten)]
    pub patch: DocumentPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub key: DocKey,
    pub cid: String,
}

/// Plaintext handed back to the caller after a retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecryptedFile {
    pub file: FileBlob,
    pub metadata: RetrievedMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_key_is_optional() {
        let request: UploadRequest = serde_json::from_value(json!({
            "name": "contract.pdf",
            "file": {"name": "contract.pdf", "bytes": "AQID"}
        }))
        .unwrap();

        assert!(request.key.is_none());
        assert_eq!(request.file.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_sign_and_upload_flattens_fields() {
        let request: SignAndUploadRequest = serde_json::from_value(json!({
            "key": "doc-1",
            "signName": "Ada",
            "address": "0xowner"
        }))
        .unwrap();

        assert_eq!(request.key, DocKey::from("doc-1"));
        assert_eq!(request.patch.sign_name.as_deref(), Some("Ada"));
        assert_eq!(request.patch.owner_address.as_deref(), Some("0xowner"));
        assert!(request.patch.file.is_none());
    }

    #[test]
    fn test_set_with_only_key_is_empty_patch() {
        let request: SetRequest = serde_json::from_value(json!({"key": "k"})).unwrap();
        assert!(request.patch.is_empty());
    }
}
