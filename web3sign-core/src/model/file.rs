//! Binary file payloads

use serde::{Deserialize, Serialize};

/// MIME type assumed for documents when none is known
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A named binary payload
///
/// Bytes travel as base64 in JSON so records and port messages stay plain
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBlob {
    /// Original filename
    pub name: String,

    /// MIME type of the payload
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Raw file contents
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

fn default_mime_type() -> String {
    PDF_MIME_TYPE.to_string()
}

impl FileBlob {
    /// Create a new file blob
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Create a PDF file blob
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, PDF_MIME_TYPE, bytes)
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
