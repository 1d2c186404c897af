//! Fixed-address wallet

use crate::lifecycle::{LifecycleError, LifecycleResult};
use crate::services::WalletProvider;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Wallet with a fixed set of addresses
///
/// Accounts are only reported by [`WalletProvider::accounts`] once authorized,
/// either up front or through [`WalletProvider::request_accounts`].
#[derive(Debug)]
pub struct StaticWallet {
    addresses: Vec<String>,
    authorized: AtomicBool,
    reject_requests: bool,
}

impl StaticWallet {
    /// Wallet whose accounts are already authorized
    pub fn authorized(addresses: Vec<String>) -> Self {
        Self {
            addresses,
            authorized: AtomicBool::new(true),
            reject_requests: false,
        }
    }

    /// Wallet that authorizes its accounts on the first request
    pub fn unauthorized(addresses: Vec<String>) -> Self {
        Self {
            addresses,
            authorized: AtomicBool::new(false),
            reject_requests: false,
        }
    }

    /// Wallet whose user declines every prompt
    pub fn rejecting() -> Self {
        Self {
            addresses: Vec::new(),
            authorized: AtomicBool::new(false),
            reject_requests: true,
        }
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> LifecycleResult<Vec<String>> {
        if self.reject_requests {
            return Err(LifecycleError::user_rejected("User rejected the request"));
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(self.addresses.clone())
    }

    async fn accounts(&self) -> LifecycleResult<Vec<String>> {
        if self.authorized.load(Ordering::SeqCst) {
            Ok(self.addresses.clone())
        } else {
            Ok(Vec::new())
        }
    }
}
