//! Wire messages

use crate::lifecycle::{
    DecryptedFile, KeyRequest, LifecycleError, RetrieveRequest, SetRequest, SignAndUploadRequest,
    UploadRequest,
};
use crate::sync::DocSnapshot;
use serde::{Deserialize, Serialize};

/// Tag reported for input that did not parse as a command
pub const INVALID_COMMAND_TAG: &str = "INVALID";

/// Inbound command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Connect,
    Upload(UploadRequest),
    Set(SetRequest),
    Del(KeyRequest),
    Sign(KeyRequest),
    SignAndUpload(SignAndUploadRequest),
    DownloadAndDecrypt(RetrieveRequest),
    /// Same flow as `DownloadAndDecrypt`
    Retrieve(RetrieveRequest),
    Sync,
}

impl Command {
    /// Wire tag of this command
    pub fn tag(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Upload(_) => "UPLOAD",
            Command::Set(_) => "SET",
            Command::Del(_) => "DEL",
            Command::Sign(_) => "SIGN",
            Command::SignAndUpload(_) => "SIGN_AND_UPLOAD",
            Command::DownloadAndDecrypt(_) => "DOWNLOAD_AND_DECRYPT",
            Command::Retrieve(_) => "RETRIEVE",
            Command::Sync => "SYNC",
        }
    }
}

/// Outbound response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    GotAccount { accounts: Vec<String> },
    GotDocs(DocSnapshot),
    DecryptedFileReceived(DecryptedFile),
    Error(ErrorReport),
}

/// Failure of one command, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Tag of the command that failed
    pub tag: String,
    pub kind: String,
    pub message: String,
    /// Wallet error code, for rejected wallet requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl ErrorReport {
    pub fn new(tag: impl Into<String>, error: &LifecycleError) -> Self {
        let code = match error {
            LifecycleError::AuthRejected { code, .. } => Some(*code),
            _ => None,
        };

        Self {
            tag: tag.into(),
            kind: error.kind().to_string(),
            message: error.to_string(),
            code,
        }
    }
}

impl From<DocSnapshot> for Response {
    fn from(snapshot: DocSnapshot) -> Self {
        Response::GotDocs(snapshot)
    }
}
