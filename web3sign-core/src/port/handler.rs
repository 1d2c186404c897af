//! Port handler

use crate::lifecycle::{LifecycleController, LifecycleError, LifecycleResult};
use crate::port::messages::{Command, ErrorReport, Response, INVALID_COMMAND_TAG};
use crate::sync::DocSnapshot;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

/// Number of responses buffered per subscriber
const RESPONSE_CAPACITY: usize = 64;

/// Routes commands to the controller and publishes responses
#[derive(Clone)]
pub struct Port {
    controller: Arc<LifecycleController>,
    api_key: String,
    tx: broadcast::Sender<Response>,
    session: Option<mpsc::UnboundedSender<Response>>,
}

impl Port {
    /// Create a port
    ///
    /// # Arguments
    /// * `controller` - Controller running the flows
    /// * `api_key` - Content provider key used by `SIGN_AND_UPLOAD`
    pub fn new(controller: Arc<LifecycleController>, api_key: impl Into<String>) -> Self {
        let (tx, _rx) = broadcast::channel(RESPONSE_CAPACITY);
        Self {
            controller,
            api_key: api_key.into(),
            tx,
            session: None,
        }
    }

    /// Port handle whose responses are also queued, without loss, on the
    /// returned receiver
    ///
    /// Broadcast subscribers may lag and skip responses; a session sees every
    /// response emitted through the returned port or its clones.
    pub fn open_session(&self) -> (Port, mpsc::UnboundedReceiver<Response>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut port = self.clone();
        port.session = Some(tx);
        (port, rx)
    }

    pub fn controller(&self) -> &Arc<LifecycleController> {
        &self.controller
    }

    /// Subscribe to direct responses and error reports
    pub fn subscribe(&self) -> broadcast::Receiver<Response> {
        self.tx.subscribe()
    }

    /// Subscribe to store snapshots, each of which becomes `GOT_DOCS`
    pub fn snapshots(&self) -> watch::Receiver<DocSnapshot> {
        self.controller.broadcaster().subscribe()
    }

    /// Emit a response to all subscribers
    ///
    /// # Returns
    /// Number of active subscribers that received the response
    pub fn emit(&self, response: Response) -> usize {
        match &self.session {
            Some(session) => {
                let delivered = self.tx.send(response.clone()).unwrap_or(0);
                delivered + usize::from(session.send(response).is_ok())
            }
            None => self.tx.send(response).unwrap_or(0),
        }
    }

    /// Tell the UI about accounts that are already authorized
    ///
    /// Does not prompt the wallet; emits nothing when no account is authorized.
    pub async fn announce_session(&self) -> LifecycleResult<()> {
        let accounts = self.controller.connected_accounts().await?;
        if !accounts.is_empty() {
            info!(accounts = accounts.len(), "Restoring wallet session");
            self.emit(Response::GotAccount { accounts });
        }
        Ok(())
    }

    /// Parse and run one JSON-encoded command
    pub async fn handle_json(&self, line: &str) -> LifecycleResult<()> {
        match serde_json::from_str::<Command>(line) {
            Ok(command) => self.handle(command).await,
            Err(e) => {
                let error = LifecycleError::ValidationFailure(format!("Invalid command: {}", e));
                warn!(error = %e, "Discarding malformed command");
                self.emit(Response::Error(ErrorReport::new(INVALID_COMMAND_TAG, &error)));
                Err(error)
            }
        }
    }

    /// Run one command
    ///
    /// Failures are logged and reported as an `ERROR` response before being
    /// returned.
    pub async fn handle(&self, command: Command) -> LifecycleResult<()> {
        let tag = command.tag();
        debug!(tag, "Handling command");

        let result = self.dispatch(command).await;
        if let Err(e) = &result {
            debug!(tag, kind = e.kind(), "Reporting command failure");
            self.emit(Response::Error(ErrorReport::new(tag, e)));
        }
        result
    }

    async fn dispatch(&self, command: Command) -> LifecycleResult<()> {
        match command {
            Command::Connect => {
                let accounts = self.controller.connect().await?;
                self.emit(Response::GotAccount { accounts });
            }
            Command::Upload(request) => {
                self.controller.upload(request).await?;
            }
            Command::Set(request) => {
                self.controller.set_fields(&request.key, request.patch).await?;
            }
            Command::Del(request) => {
                self.controller.delete(&request.key).await?;
            }
            Command::Sign(request) => {
                self.controller.sign(&request.key).await?;
            }
            Command::SignAndUpload(request) => {
                self.controller.sign_and_upload(&self.api_key, request).await?;
            }
            Command::DownloadAndDecrypt(request) | Command::Retrieve(request) => {
                let decrypted = self.controller.download_and_decrypt(request).await?;
                self.emit(Response::DecryptedFileReceived(decrypted));
            }
            Command::Sync => {
                self.controller.sync().await?;
            }
        }
        Ok(())
    }
}
