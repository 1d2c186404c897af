//! Sync snapshots
//!
//! After every mutating flow the controller lists the whole store and
//! publishes the result here. Subscribers only ever need the newest listing,
//! so the channel keeps just the last snapshot.

pub mod broadcaster;

pub use broadcaster::{DocSnapshot, SyncBroadcaster};
