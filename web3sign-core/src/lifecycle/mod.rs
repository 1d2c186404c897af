//! Document lifecycle flows
//!
//! [`LifecycleController`] turns port commands into read-modify-write merges
//! against the [`crate::store::DocumentStore`], drives the wallet, signing,
//! encryption and content collaborators, and republishes the full listing
//! after every mutation.

pub mod controller;
pub mod errors;
pub mod key_locks;
pub mod requests;

pub use controller::{LifecycleController, DEFAULT_FILE_NAME};
pub use errors::{LifecycleError, LifecycleResult, UNAUTHORIZED, USER_REJECTED_REQUEST};
pub use key_locks::KeyLocks;
pub use requests::{
    DecryptedFile, KeyRequest, RetrieveRequest, SetRequest, SignAndUploadRequest, UploadRequest,
};
