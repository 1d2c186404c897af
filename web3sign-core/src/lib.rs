//! Document lifecycle and encrypted sync engine
//!
//! Documents move through draft, signed, encrypted, uploaded and retrieved
//! stages. Every stage is a shallow merge into one record of a
//! [`store::DocumentStore`]; after each mutation the whole store is
//! republished to subscribers through [`sync::SyncBroadcaster`].

pub mod access;
pub mod adapters;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod port;
pub mod services;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_utils;

pub use access::{AccessDescriptor, AccessPolicyEncoder};
pub use config::Config;
pub use lifecycle::{LifecycleController, LifecycleError, LifecycleResult};
pub use logging::{init_logging, LogLevel};
pub use model::{DocKey, Document, DocumentPatch, FileBlob};
pub use port::{Command, Port, Response};
pub use store::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
pub use sync::{DocSnapshot, SyncBroadcaster};
