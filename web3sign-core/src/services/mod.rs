//! External collaborator traits
//!
//! The lifecycle engine never talks to a wallet, an encryption network or a
//! storage provider directly. It is handed implementations of these traits
//! at construction time.
//!
//! ```text
//! LifecycleController
//!       |
//!       +---> WalletProvider      (accounts)
//!       +---> SignatureService    (sign documents)
//!       +---> EncryptionService   (encrypt / authenticate / decrypt)
//!       +---> ContentStorage      (upload / fetch by content id)
//!       +---> SignatureStamper    (optional, annotate the file)
//! ```

pub mod content;
pub mod encryption;
pub mod signature;
pub mod wallet;

pub use content::ContentStorage;
pub use encryption::{AuthSignature, DecryptedPayload, EncryptedBlob, EncryptionService};
pub use signature::{SignatureService, SignatureStamper};
pub use wallet::WalletProvider;
