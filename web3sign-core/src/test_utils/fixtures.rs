//! Test fixtures for creating common test objects

use crate::adapters::{DigestSigner, EnvelopeCipher, LocalContentStore, StaticWallet};
use crate::lifecycle::{LifecycleController, UploadRequest};
use crate::model::{DocKey, FileBlob};
use crate::store::{DocumentStore, MemoryDocumentStore};
use std::sync::Arc;

/// Address of the wallet every fixture controller acts as
pub const ACTIVE_ADDRESS: &str = "0x1111111111111111111111111111111111111111";

/// Address of a document owner distinct from the active wallet
pub const OWNER_ADDRESS: &str = "0x2222222222222222222222222222222222222222";

/// A small PDF-looking file
pub fn sample_pdf(name: &str) -> FileBlob {
    FileBlob::pdf(name, format!("%PDF-1.7 {}", name).into_bytes())
}

/// Upload request for `key` with a sample file
pub fn upload_request(key: &str) -> UploadRequest {
    UploadRequest {
        key: Some(DocKey::from(key)),
        name: Some(format!("{}.pdf", key)),
        file: sample_pdf(&format!("{}.pdf", key)),
    }
}

/// Controller wired to offline adapters around the given store
pub fn controller_with_store(store: Arc<dyn DocumentStore>) -> LifecycleController {
    LifecycleController::new(
        store,
        Arc::new(StaticWallet::authorized(vec![ACTIVE_ADDRESS.to_string()])),
        Arc::new(DigestSigner::new(ACTIVE_ADDRESS)),
        Arc::new(EnvelopeCipher::new(ACTIVE_ADDRESS)),
        Arc::new(LocalContentStore::in_memory()),
    )
}

/// Controller over a fresh in-memory store, returned together with the store
pub fn memory_controller() -> (LifecycleController, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    (controller_with_store(store.clone()), store)
}
