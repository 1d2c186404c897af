//! Wallet identity provider

use crate::lifecycle::LifecycleResult;
use async_trait::async_trait;

/// Source of the user's wallet addresses
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Prompt the user to authorize accounts
    ///
    /// A declined prompt fails with `AuthRejected` carrying code 4001.
    async fn request_accounts(&self) -> LifecycleResult<Vec<String>>;

    /// Accounts already authorized, without prompting; empty if none
    async fn accounts(&self) -> LifecycleResult<Vec<String>>;
}
