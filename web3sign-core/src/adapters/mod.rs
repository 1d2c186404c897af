//! Offline collaborator implementations
//!
//! Self-contained implementations of the [`crate::services`] traits. They let
//! the CLI run without a wallet extension or network access and give tests a
//! deterministic backend. None of them provides confidentiality or real
//! signatures.

pub mod digest_signer;
pub mod envelope_cipher;
pub mod local_content;
pub mod static_wallet;

pub use digest_signer::DigestSigner;
pub use envelope_cipher::EnvelopeCipher;
pub use local_content::LocalContentStore;
pub use static_wallet::StaticWallet;
