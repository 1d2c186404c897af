//! Document data model
//!
//! A [`Document`] is a flat record keyed by a [`DocKey`]. Its optional fields
//! fill in as the document moves through the lifecycle (draft, signed,
//! encrypted, uploaded, retrieved). Partial updates are expressed as a
//! [`DocumentPatch`] and applied with a shallow merge.

pub mod document;
pub mod file;
pub mod remote;

pub use document::{DocEntry, DocKey, Document, DocumentPatch, LifecycleStage};
pub use file::{FileBlob, PDF_MIME_TYPE};
pub use remote::{RemoteReference, RetrievedMetadata};
