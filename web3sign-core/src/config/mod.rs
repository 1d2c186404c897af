//! Configuration management for web3sign
//!
//! Settings come from defaults, an optional TOML file and `WEB3SIGN_*`
//! environment variables, applied in that order.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document store configuration
    pub store: StoreConfig,

    /// Content provider configuration
    pub provider: ProviderConfig,

    /// Access policy configuration
    pub access: AccessConfig,

    /// Wallet configuration
    pub wallet: WalletConfig,

    /// Lifecycle engine configuration
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Which document store backs the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!("Unknown store backend: {}", other))),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// SQLite database file; `~` and `$VARS` are expanded by the CLI
    pub path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// How long a connection waits on a locked database
    #[serde(with = "humantime_serde")]
    pub busy_timeout: Duration,

    /// Directory for uploaded blobs when using local content storage
    pub content_dir: PathBuf,
}

/// Content provider configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key sent with uploads
    pub api_key: Option<String>,
}

/// Access policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Chain named in access conditions and auth signatures
    pub chain: String,
}

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Addresses the offline wallet exposes; the first one is active
    pub accounts: Vec<String>,

    /// Report accounts without a prior CONNECT
    pub pre_authorized: bool,
}

/// Lifecycle engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Serialize read-modify-write merges on the same key
    pub serialize_writes: bool,

    /// Publish a snapshot as soon as the engine starts
    pub sync_on_start: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: PathBuf::from("~/.web3sign/docs.db"),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
            content_dir: PathBuf::from("~/.web3sign/content"),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            chain: crate::access::DEFAULT_CHAIN.to_string(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            pre_authorized: true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            serialize_writes: true,
            sync_on_start: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid {} flag: {}", name, e)))
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: WEB3SIGN_<SECTION>_<KEY>
    /// Example: WEB3SIGN_PROVIDER_API_KEY=...
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay `WEB3SIGN_*` variables from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Overlay variables resolved through `lookup`, then validate
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Store config
        if let Some(backend) = lookup("WEB3SIGN_STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        if let Some(path) = lookup("WEB3SIGN_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(max) = lookup("WEB3SIGN_STORE_MAX_CONNECTIONS") {
            self.store.max_connections = max.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid max connections: {}", e))
            })?;
        }
        if let Some(timeout) = lookup("WEB3SIGN_STORE_BUSY_TIMEOUT") {
            self.store.busy_timeout = humantime_serde::re::humantime::parse_duration(&timeout)
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid busy timeout: {}", e)))?;
        }
        if let Some(dir) = lookup("WEB3SIGN_STORE_CONTENT_DIR") {
            self.store.content_dir = PathBuf::from(dir);
        }

        // Provider config
        if let Some(api_key) = lookup("WEB3SIGN_PROVIDER_API_KEY") {
            self.provider.api_key = Some(api_key);
        }

        // Access config
        if let Some(chain) = lookup("WEB3SIGN_ACCESS_CHAIN") {
            self.access.chain = chain;
        }

        // Wallet config
        if let Some(accounts) = lookup("WEB3SIGN_WALLET_ACCOUNTS") {
            self.wallet.accounts = accounts
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(flag) = lookup("WEB3SIGN_WALLET_PRE_AUTHORIZED") {
            self.wallet.pre_authorized = parse_flag("pre-authorized", &flag)?;
        }

        // Engine config
        if let Some(flag) = lookup("WEB3SIGN_ENGINE_SERIALIZE_WRITES") {
            self.engine.serialize_writes = parse_flag("serialize-writes", &flag)?;
        }
        if let Some(flag) = lookup("WEB3SIGN_ENGINE_SYNC_ON_START") {
            self.engine.sync_on_start = parse_flag("sync-on-start", &flag)?;
        }

        // Logging config
        if let Some(level) = lookup("WEB3SIGN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("WEB3SIGN_LOG_JSON") {
            self.logging.json_format = parse_flag("JSON", &json)?;
        }

        self.validate()
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.max_connections == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        if self.access.chain.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "access chain must not be empty".to_string(),
            ));
        }

        if let Some(account) = self.wallet.accounts.iter().find(|a| !is_address(a)) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid wallet address: {}",
                account
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }

    /// API key for uploads, empty when none is configured
    pub fn api_key(&self) -> &str {
        self.provider.api_key.as_deref().unwrap_or("")
    }
}

/// `0x` followed by 40 hex digits
fn is_address(candidate: &str) -> bool {
    candidate.len() == 42
        && candidate.starts_with("0x")
        && candidate[2..].bytes().all(|b| b.is_ascii_hexdigit())
}
