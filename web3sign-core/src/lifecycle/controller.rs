//! Lifecycle Controller - orchestrates document flows
//!
//! # Responsibilities
//!
//! - **Merges**: read-modify-write of single records (`merge_update`)
//! - **Signing**: signature over the stored record
//! - **Publishing**: access policy, encryption and upload of a record
//! - **Retrieval**: fetch, decrypt and remember what came back
//! - **Sync**: republish the full listing after every mutation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │   LifecycleController    │
//! └──┬─────┬─────┬─────┬─────┘
//!    │     │     │     │
//!    ▼     ▼     ▼     ▼
//!  Store Wallet Crypto Content ──► SyncBroadcaster
//! ```
//!
//! Failures are logged at the flow boundary and returned. Nothing is retried
//! and merges that already landed are not rolled back.

use crate::{
    access::AccessPolicyEncoder,
    lifecycle::{
        errors::{LifecycleError, LifecycleResult},
        key_locks::KeyLocks,
        requests::{DecryptedFile, RetrieveRequest, SignAndUploadRequest, UploadRequest},
    },
    metrics,
    model::{DocKey, Document, DocumentPatch, FileBlob, RetrievedMetadata, PDF_MIME_TYPE},
    services::{
        ContentStorage, EncryptionService, SignatureService, SignatureStamper, WalletProvider,
    },
    store::DocumentStore,
    sync::SyncBroadcaster,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// File name used when retrieved metadata carries none
pub const DEFAULT_FILE_NAME: &str = "filename";

/// Lifecycle Controller - runs every document flow
pub struct LifecycleController {
    store: Arc<dyn DocumentStore>,
    wallet: Arc<dyn WalletProvider>,
    signer: Arc<dyn SignatureService>,
    encryption: Arc<dyn EncryptionService>,
    content: Arc<dyn ContentStorage>,

    /// Optional visual signature applied before publishing
    stamper: Option<Arc<dyn SignatureStamper>>,

    encoder: AccessPolicyEncoder,
    broadcaster: SyncBroadcaster,

    /// Present when same-key merges are serialized
    key_locks: Option<KeyLocks>,

    /// Keeps published listings in the order they were read
    sync_lock: Mutex<()>,
}

impl LifecycleController {
    /// Create a controller over the given collaborators
    ///
    /// Uses the default chain, a fresh broadcaster, no stamper and
    /// unserialized writes; see the `with_*` methods.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        wallet: Arc<dyn WalletProvider>,
        signer: Arc<dyn SignatureService>,
        encryption: Arc<dyn EncryptionService>,
        content: Arc<dyn ContentStorage>,
    ) -> Self {
        Self {
            store,
            wallet,
            signer,
            encryption,
            content,
            stamper: None,
            encoder: AccessPolicyEncoder::default(),
            broadcaster: SyncBroadcaster::new(),
            key_locks: None,
            sync_lock: Mutex::new(()),
        }
    }

    pub fn with_encoder(mut self, encoder: AccessPolicyEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: SyncBroadcaster) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_stamper(mut self, stamper: Arc<dyn SignatureStamper>) -> Self {
        self.stamper = Some(stamper);
        self
    }

    /// Serialize merges on the same key
    pub fn with_serialized_writes(mut self, enabled: bool) -> Self {
        self.key_locks = enabled.then(KeyLocks::new);
        self
    }

    pub fn broadcaster(&self) -> &SyncBroadcaster {
        &self.broadcaster
    }

    pub fn encoder(&self) -> &AccessPolicyEncoder {
        &self.encoder
    }

    pub fn serializes_writes(&self) -> bool {
        self.key_locks.is_some()
    }

    /// Read a record, overlay `patch`, write the full record back
    ///
    /// A missing record starts out empty. Without serialized writes two
    /// concurrent merges on one key can both read the old record, and the
    /// later write then drops the earlier patch.
    pub async fn merge_update(&self, key: &DocKey, patch: DocumentPatch) -> LifecycleResult<Document> {
        let _guard = match &self.key_locks {
            Some(locks) => Some(locks.lock(key).await),
            None => None,
        };

        let current = self.store.get(key).await?.unwrap_or_default();
        let merged = current.merged(patch);
        self.store.set(key, merged.clone()).await?;

        debug!(key = %key, stage = %merged.stage(), "Merged document");
        Ok(merged)
    }

    /// Store a new draft and sync
    ///
    /// # Returns
    ///
    /// The key the draft was stored under; generated when the request has none
    pub async fn upload(&self, request: UploadRequest) -> LifecycleResult<DocKey> {
        observe("upload", async {
            let key = match request.key {
                Some(key) => {
                    require_key(&key)?;
                    key
                }
                None => DocKey::generate(),
            };

            let doc = Document::draft(request.name, request.file);
            info!(
                key = %key,
                title = doc.display_name().unwrap_or_default(),
                size = doc.file.as_ref().map_or(0, |f| f.len()),
                "Uploading document"
            );

            self.store.set(&key, doc).await?;
            self.publish_snapshot().await?;

            Ok(key)
        })
        .await
    }

    /// Merge arbitrary fields into a record and sync
    pub async fn set_fields(&self, key: &DocKey, patch: DocumentPatch) -> LifecycleResult<Document> {
        observe("set", async {
            require_key(key)?;
            let doc = self.merge_update(key, patch).await?;
            self.publish_snapshot().await?;
            Ok(doc)
        })
        .await
    }

    /// Sign the stored record and keep the signature on it
    pub async fn sign(&self, key: &DocKey) -> LifecycleResult<Document> {
        observe("sign", async {
            require_key(key)?;

            let doc = self.store.get(key).await?.ok_or_else(|| {
                LifecycleError::ValidationFailure(format!("No document stored under key {}", key))
            })?;

            info!(key = %key, "Signing document");
            let signature = self.signer.sign(&doc).await?;

            let doc = self
                .merge_update(key, DocumentPatch::new().signed(signature))
                .await?;
            self.publish_snapshot().await?;

            Ok(doc)
        })
        .await
    }

    /// Merge the request fields, then encrypt the record under an access
    /// policy and upload it
    ///
    /// On success the record carries the upload receipt and the descriptor.
    pub async fn sign_and_upload(
        &self,
        api_key: &str,
        request: SignAndUploadRequest,
    ) -> LifecycleResult<Document> {
        observe("sign_and_upload", async {
            let key = request.key;
            require_key(&key)?;

            let mut doc = self.merge_update(&key, request.patch).await?;

            let stamped = match (&self.stamper, &doc.file, &doc.sign_name) {
                (Some(stamper), Some(file), Some(sign_name)) => {
                    debug!(key = %key, sign_name = %sign_name, "Stamping signature onto file");
                    Some(stamper.stamp(file, sign_name).await?)
                }
                _ => None,
            };
            if let Some(file) = stamped {
                doc = self.merge_update(&key, DocumentPatch::new().file(file)).await?;
            }

            let active = self.active_account().await?;

            if doc.file.is_none() {
                return Err(LifecycleError::ValidationFailure(format!(
                    "Document {} has no file to encrypt",
                    key
                )));
            }

            let descriptor = self.encoder.encode(doc.owner_address.as_deref(), &active);

            info!(
                key = %key,
                address = %active,
                conditions = descriptor.conditions().count(),
                "Encrypting document"
            );

            let blob = self.encryption.encrypt(&active, &doc, &descriptor).await?;
            let remote = self.content.upload(api_key, &blob).await?;

            info!(key = %key, cid = %remote.content_id, size = remote.size, "Document uploaded");

            let doc = self
                .merge_update(&key, DocumentPatch::new().remote(remote).access(descriptor))
                .await?;
            self.publish_snapshot().await?;

            Ok(doc)
        })
        .await
    }

    /// Fetch and decrypt an uploaded document
    ///
    /// The decrypted metadata (with the content id) is merged into the record.
    /// Calling this twice yields the same plaintext.
    pub async fn download_and_decrypt(&self, request: RetrieveRequest) -> LifecycleResult<DecryptedFile> {
        observe("download_and_decrypt", async {
            let RetrieveRequest { key, cid } = request;
            require_key(&key)?;

            info!(key = %key, cid = %cid, "Retrieving document");

            let blob = self.content.fetch(&cid).await?;
            let auth = self.encryption.authenticate(self.encoder.chain()).await?;
            let payload = self.encryption.decrypt(&blob, &auth).await?;

            let metadata = RetrievedMetadata::new(cid, payload.metadata);
            self.merge_update(&key, DocumentPatch::new().metadata(metadata.clone()))
                .await?;

            let file = FileBlob::new(
                metadata.file_name().unwrap_or(DEFAULT_FILE_NAME),
                metadata.mime_type().unwrap_or(PDF_MIME_TYPE),
                payload.bytes,
            );

            self.publish_snapshot().await?;

            Ok(DecryptedFile { file, metadata })
        })
        .await
    }

    /// Remove a record and sync
    pub async fn delete(&self, key: &DocKey) -> LifecycleResult<()> {
        observe("delete", async {
            require_key(key)?;
            self.store.delete(key).await?;

            if let Some(locks) = &self.key_locks {
                locks.prune();
            }

            info!(key = %key, "Document deleted");
            self.publish_snapshot().await?;
            Ok(())
        })
        .await
    }

    /// List the whole store and publish it
    ///
    /// # Returns
    ///
    /// Version of the published snapshot
    pub async fn sync(&self) -> LifecycleResult<u64> {
        observe("sync", self.publish_snapshot()).await
    }

    async fn publish_snapshot(&self) -> LifecycleResult<u64> {
        let _guard = self.sync_lock.lock().await;

        let docs = self.store.list().await?;
        let count = docs.len();
        let version = self.broadcaster.publish(docs);
        metrics::record_sync();

        debug!(version, count, "Published snapshot");
        Ok(version)
    }

    /// Ask the wallet to authorize its accounts
    pub async fn connect(&self) -> LifecycleResult<Vec<String>> {
        observe("connect", async {
            let accounts = self.wallet.request_accounts().await?;
            info!(accounts = accounts.len(), "Wallet connected");
            Ok(accounts)
        })
        .await
    }

    /// Accounts already authorized, without prompting
    pub async fn connected_accounts(&self) -> LifecycleResult<Vec<String>> {
        self.wallet.accounts().await
    }

    async fn active_account(&self) -> LifecycleResult<String> {
        self.wallet
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LifecycleError::unauthorized("No authorized wallet account"))
    }
}

fn require_key(key: &DocKey) -> LifecycleResult<()> {
    if key.is_blank() {
        Err(LifecycleError::ValidationFailure(
            "Document key must not be empty".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Time a flow, count its outcome and log failures
async fn observe<T, F>(flow: &'static str, fut: F) -> LifecycleResult<T>
where
    F: Future<Output = LifecycleResult<T>>,
{
    let timer = metrics::Timer::new(flow);
    let result = fut.await;
    timer.stop();

    metrics::record_flow(flow, result.is_ok());
    if let Err(e) = &result {
        warn!(flow, kind = e.kind(), error = %e, "Flow failed");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{DigestSigner, EnvelopeCipher, LocalContentStore, StaticWallet};
    use crate::lifecycle::{UNAUTHORIZED, USER_REJECTED_REQUEST};
    use crate::model::LifecycleStage;
    use crate::test_utils::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::time::Duration;

    const API_KEY: &str = "test-api-key";

    struct UpperCaseStamper;

    #[async_trait]
    impl SignatureStamper for UpperCaseStamper {
        async fn stamp(&self, file: &FileBlob, sign_name: &str) -> LifecycleResult<FileBlob> {
            let mut bytes = file.bytes.clone();
            bytes.extend_from_slice(format!(" signed by {}", sign_name.to_uppercase()).as_bytes());
            Ok(FileBlob::new(file.name.clone(), file.mime_type.clone(), bytes))
        }
    }

    fn publish_request(key: &DocKey) -> SignAndUploadRequest {
        SignAndUploadRequest {
            key: key.clone(),
            patch: DocumentPatch::new().sign_name("Ada"),
        }
    }

    #[tokio::test]
    async fn test_upload_stores_draft_and_syncs() {
        let (controller, store) = memory_controller();
        let mut rx = controller.broadcaster().subscribe();

        let key = controller.upload(upload_request("a")).await.unwrap();
        assert_eq!(key, DocKey::from("a"));

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.stage(), LifecycleStage::Draft);
        assert_eq!(doc.name.as_deref(), Some("a.pdf"));

        let snapshot = changed_timeout(&mut rx, Duration::from_secs(1)).await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_without_key_generates_one() {
        let (controller, store) = memory_controller();
        let request = UploadRequest {
            key: None,
            name: None,
            file: sample_pdf("x.pdf"),
        };

        let key = controller.upload(request).await.unwrap();
        assert!(!key.is_blank());
        assert!(store.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_key_is_rejected() {
        let (controller, store) = memory_controller();
        let mut request = upload_request("a");
        request.key = Some(DocKey::from("  "));

        let err = controller.upload(request).await.unwrap_err();
        assert!(matches!(err, LifecycleError::ValidationFailure(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_merge_keeps_unpatched_fields() {
        let (controller, _store) = memory_controller();
        let key = controller.upload(upload_request("a")).await.unwrap();

        let doc = controller
            .set_fields(&key, DocumentPatch::new().sign_name("Ada"))
            .await
            .unwrap();

        assert_eq!(doc.sign_name.as_deref(), Some("Ada"));
        assert_eq!(doc.name.as_deref(), Some("a.pdf"));
        assert!(doc.file.is_some());
    }

    #[tokio::test]
    async fn test_merge_on_missing_key_creates_record() {
        let (controller, store) = memory_controller();
        let key = DocKey::from("fresh");

        controller
            .merge_update(&key, DocumentPatch::new().name("n"))
            .await
            .unwrap();

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.name.as_deref(), Some("n"));
        assert!(doc.file.is_none());
    }

    #[tokio::test]
    async fn test_sign_preserves_other_fields() {
        let (controller, store) = memory_controller();
        let key = controller.upload(upload_request("a")).await.unwrap();
        let before = store.get(&key).await.unwrap().unwrap();

        let signed = controller.sign(&key).await.unwrap();

        assert!(signed.signed.is_some());
        assert_eq!(signed.name, before.name);
        assert_eq!(signed.file, before.file);
        assert_eq!(signed.stage(), LifecycleStage::Signed);
    }

    #[tokio::test]
    async fn test_sign_missing_key_is_validation_failure() {
        let (controller, store) = memory_controller();
        let err = controller.sign(&DocKey::from("ghost")).await.unwrap_err();

        assert!(matches!(err, LifecycleError::ValidationFailure(_)));
        assert!(store.get(&DocKey::from("ghost")).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_merges_lose_an_update_without_serialization() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(20)));
        let controller = controller_with_store(store.clone());
        let key = DocKey::from("race");

        let (a, b) = tokio::join!(
            controller.merge_update(&key, DocumentPatch::new().name("from-a")),
            controller.merge_update(&key, DocumentPatch::new().signed("from-b")),
        );
        a.unwrap();
        b.unwrap();

        let doc = store.get(&key).await.unwrap().unwrap();
        let survivors = [doc.name.is_some(), doc.signed.is_some()]
            .iter()
            .filter(|present| **present)
            .count();
        assert_eq!(survivors, 1, "one patch should have been overwritten: {:?}", doc);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_merges_survive_with_serialization() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(20)));
        let controller = controller_with_store(store.clone()).with_serialized_writes(true);
        let key = DocKey::from("race");

        let (a, b) = tokio::join!(
            controller.merge_update(&key, DocumentPatch::new().name("from-a")),
            controller.merge_update(&key, DocumentPatch::new().signed("from-b")),
        );
        a.unwrap();
        b.unwrap();

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.name.as_deref(), Some("from-a"));
        assert_eq!(doc.signed.as_deref(), Some("from-b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_many_serialized_merges_all_land() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(5)));
        let controller = controller_with_store(store.clone()).with_serialized_writes(true);
        let key = DocKey::from("busy");

        let patches = vec![
            DocumentPatch::new().name("n"),
            DocumentPatch::new().signed("s"),
            DocumentPatch::new().sign_name("Ada"),
            DocumentPatch::new().owner_address(OWNER_ADDRESS),
            DocumentPatch::new().file(sample_pdf("busy.pdf")),
        ];
        let results = futures::future::join_all(
            patches.into_iter().map(|patch| controller.merge_update(&key, patch)),
        )
        .await;
        assert!(results.iter().all(|r| r.is_ok()));

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.name.as_deref(), Some("n"));
        assert_eq!(doc.signed.as_deref(), Some("s"));
        assert_eq!(doc.sign_name.as_deref(), Some("Ada"));
        assert_eq!(doc.owner_address.as_deref(), Some(OWNER_ADDRESS));
        assert!(doc.file.is_some());
    }

    #[tokio::test]
    async fn test_sync_lists_every_key_once() {
        let (controller, _store) = memory_controller();
        for key in ["a", "b", "c"] {
            controller.upload(upload_request(key)).await.unwrap();
        }
        controller.delete(&DocKey::from("b")).await.unwrap();
        controller.set_fields(&DocKey::from("a"), DocumentPatch::new().name("renamed")).await.unwrap();

        controller.sync().await.unwrap();
        let snapshot = controller.broadcaster().latest();

        let keys: Vec<_> = snapshot.docs.iter().map(|e| e.key.as_str().to_string()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
        assert_eq!(
            snapshot.get(&DocKey::from("a")).and_then(|d| d.name.as_deref()),
            Some("renamed")
        );
    }

    #[tokio::test]
    async fn test_sync_versions_increase() {
        let (controller, _store) = memory_controller();
        let first = controller.sync().await.unwrap();
        let second = controller.sync().await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_sign_and_upload_records_receipt_and_policy() {
        let (controller, store) = memory_controller();
        let key = controller.upload(upload_request("a")).await.unwrap();

        let request = SignAndUploadRequest {
            key: key.clone(),
            patch: DocumentPatch::new().sign_name("Ada").owner_address(OWNER_ADDRESS),
        };
        let doc = controller.sign_and_upload(API_KEY, request).await.unwrap();

        assert_eq!(doc.stage(), LifecycleStage::Uploaded);
        assert_eq!(doc.sign_name.as_deref(), Some("Ada"));

        let access = doc.access.clone().unwrap();
        assert!(access.permits(OWNER_ADDRESS));
        assert!(access.permits(ACTIVE_ADDRESS));
        assert_eq!(access.conditions().count(), 2);

        assert_eq!(store.get(&key).await.unwrap().unwrap(), doc);
    }

    #[tokio::test]
    async fn test_sign_and_upload_applies_stamper() {
        let (controller, store) = memory_controller();
        let controller = controller.with_stamper(Arc::new(UpperCaseStamper));
        let key = controller.upload(upload_request("a")).await.unwrap();

        controller.sign_and_upload(API_KEY, publish_request(&key)).await.unwrap();

        let file = store.get(&key).await.unwrap().unwrap().file.unwrap();
        assert!(String::from_utf8(file.bytes).unwrap().ends_with("signed by ADA"));
    }

    #[tokio::test]
    async fn test_sign_and_upload_without_file_keeps_merge() {
        let (controller, store) = memory_controller();
        let key = DocKey::from("empty");

        let err = controller
            .sign_and_upload(API_KEY, publish_request(&key))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::ValidationFailure(_)));

        // The merge from step one is not rolled back
        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.sign_name.as_deref(), Some("Ada"));
        assert!(doc.remote.is_none());
    }

    #[tokio::test]
    async fn test_sign_and_upload_upload_failure_keeps_merge() {
        let (controller, store) = memory_controller();
        let key = controller.upload(upload_request("a")).await.unwrap();

        let err = controller
            .sign_and_upload("", publish_request(&key))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NetworkFailure(_)));

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc.sign_name.as_deref(), Some("Ada"));
        assert!(doc.remote.is_none());
        assert!(doc.access.is_none());
    }

    #[tokio::test]
    async fn test_sign_and_upload_needs_authorized_account() {
        let store = Arc::new(crate::store::MemoryDocumentStore::new());
        let controller = LifecycleController::new(
            store.clone(),
            Arc::new(StaticWallet::unauthorized(vec![ACTIVE_ADDRESS.to_string()])),
            Arc::new(DigestSigner::new(ACTIVE_ADDRESS)),
            Arc::new(EnvelopeCipher::new(ACTIVE_ADDRESS)),
            Arc::new(LocalContentStore::in_memory()),
        );
        let key = controller.upload(upload_request("a")).await.unwrap();

        match controller.sign_and_upload(API_KEY, publish_request(&key)).await {
            Err(LifecycleError::AuthRejected { code, .. }) => assert_eq!(code, UNAUTHORIZED),
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_surfaces_rejection() {
        let controller = LifecycleController::new(
            Arc::new(crate::store::MemoryDocumentStore::new()),
            Arc::new(StaticWallet::rejecting()),
            Arc::new(DigestSigner::new(ACTIVE_ADDRESS)),
            Arc::new(EnvelopeCipher::new(ACTIVE_ADDRESS)),
            Arc::new(LocalContentStore::in_memory()),
        );

        match controller.connect().await {
            Err(LifecycleError::AuthRejected { code, .. }) => assert_eq!(code, USER_REJECTED_REQUEST),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(controller.connected_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_and_decrypt_is_idempotent() {
        let (controller, store) = memory_controller();
        let key = controller.upload(upload_request("a")).await.unwrap();
        let doc = controller.sign_and_upload(API_KEY, publish_request(&key)).await.unwrap();
        let cid = doc.remote.unwrap().content_id;

        let request = RetrieveRequest { key: key.clone(), cid: cid.clone() };
        let first = controller.download_and_decrypt(request.clone()).await.unwrap();
        let second = controller.download_and_decrypt(request).await.unwrap();

        assert_eq!(first.file.bytes, second.file.bytes);
        assert_eq!(first.file.bytes, sample_pdf("a.pdf").bytes);
        assert_eq!(first.file.name, "a.pdf");
        assert_eq!(first.file.mime_type, PDF_MIME_TYPE);

        let stored = store.get(&key).await.unwrap().unwrap();
        assert_eq!(stored.stage(), LifecycleStage::Retrieved);
        assert_eq!(stored.metadata.unwrap().cid, cid);
    }

    #[tokio::test]
    async fn test_download_of_unknown_cid_is_network_failure() {
        let (controller, store) = memory_controller();
        let request = RetrieveRequest {
            key: DocKey::from("a"),
            cid: LocalContentStore::content_id(b"nothing"),
        };

        let err = controller.download_and_decrypt(request).await.unwrap_err();
        assert!(matches!(err, LifecycleError::NetworkFailure(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let store = Arc::new(FailingStore::new());
        let controller = controller_with_store(store.clone());
        controller.upload(upload_request("a")).await.unwrap();

        store.set_failing(true);
        let err = controller.sign(&DocKey::from("a")).await.unwrap_err();
        assert!(matches!(err, LifecycleError::StorageUnavailable(_)));
        assert!(controller.sync().await.is_err());
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let (controller, _store) = memory_controller();
        controller.delete(&DocKey::from("never")).await.unwrap();
        assert!(controller.broadcaster().latest().is_empty());
    }

    #[tokio::test]
    async fn test_delete_publishes_remaining_docs() {
        let (controller, store) = memory_controller();
        let a = controller.upload(upload_request("a")).await.unwrap();
        let b = controller.upload(upload_request("b")).await.unwrap();
        let before = controller.broadcaster().latest().version;

        controller.delete(&a).await.unwrap();

        let snapshot = controller.broadcaster().latest();
        assert!(snapshot.version > before);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get(&a).is_none());
        assert!(snapshot.get(&b).is_some());
        assert!(store.get(&a).await.unwrap().is_none());
    }
}
