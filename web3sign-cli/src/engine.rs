//! Wiring from configuration to a running controller

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use web3sign_core::adapters::{DigestSigner, EnvelopeCipher, LocalContentStore, StaticWallet};
use web3sign_core::config::{Config, StoreBackend};
use web3sign_core::services::ContentStorage;
use web3sign_core::{
    AccessPolicyEncoder, DocumentStore, LifecycleController, MemoryDocumentStore, Port,
    SqliteDocumentStore,
};

/// Config file read when `--config` is not given, if it exists
pub const DEFAULT_CONFIG_PATH: &str = "~/.web3sign/config.toml";

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path
        .to_str()
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))?;
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Load the file configuration (explicit or default) and apply `WEB3SIGN_*`
/// overrides
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(expand_path(path)?),
        None => {
            let default_path = expand_path(Path::new(DEFAULT_CONFIG_PATH))?;
            default_path.exists().then_some(default_path)
        }
    };

    let config = match path {
        Some(path) => {
            let mut config = Config::from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env().context("Invalid WEB3SIGN_* environment override")?;
            config
        }
        None => Config::from_env().context("Invalid WEB3SIGN_* environment override")?,
    };

    Ok(config)
}

/// Build a controller backed by the configured store and offline adapters
pub fn build_controller(config: &Config) -> Result<LifecycleController> {
    let (store, content): (Arc<dyn DocumentStore>, Arc<dyn ContentStorage>) =
        match config.store.backend {
            StoreBackend::Sqlite => {
                let path = expand_path(&config.store.path)?;
                let content_dir = expand_path(&config.store.content_dir)?;
                info!(path = %path.display(), "Opening document store");

                let store = SqliteDocumentStore::open_with(
                    &path,
                    config.store.max_connections,
                    config.store.busy_timeout,
                )
                .with_context(|| format!("Failed to open document store {}", path.display()))?;

                (Arc::new(store), Arc::new(LocalContentStore::at(content_dir)))
            }
            StoreBackend::Memory => {
                debug!("Using in-memory document store");
                (
                    Arc::new(MemoryDocumentStore::new()),
                    Arc::new(LocalContentStore::in_memory()),
                )
            }
        };

    let accounts = config.wallet.accounts.clone();
    let active = accounts.first().cloned().unwrap_or_default();
    let wallet = if config.wallet.pre_authorized {
        StaticWallet::authorized(accounts)
    } else {
        StaticWallet::unauthorized(accounts)
    };

    Ok(LifecycleController::new(
        store,
        Arc::new(wallet),
        Arc::new(DigestSigner::new(active.clone())),
        Arc::new(EnvelopeCipher::new(active)),
        content,
    )
    .with_encoder(AccessPolicyEncoder::new(config.access.chain.clone()))
    .with_serialized_writes(config.engine.serialize_writes))
}

/// Build the command port for the serve loop
pub fn build_port(config: &Config) -> Result<Port> {
    let controller = build_controller(config)?;
    Ok(Port::new(Arc::new(controller), config.api_key()))
}
