//! Snapshot broadcaster

use crate::model::{DocEntry, DocKey, Document};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Full listing of the store at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocSnapshot {
    /// Increases by one on every publish; 0 means nothing published yet
    pub version: u64,
    pub docs: Vec<DocEntry>,
}

impl DocSnapshot {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Look up a document in the snapshot
    pub fn get(&self, key: &DocKey) -> Option<&Document> {
        self.docs.iter().find(|entry| &entry.key == key).map(|entry| &entry.doc)
    }
}

/// Publishes store snapshots to any number of subscribers
///
/// Backed by a watch channel: late subscribers immediately see the latest
/// snapshot and slow subscribers may skip intermediate ones.
#[derive(Clone)]
pub struct SyncBroadcaster {
    tx: watch::Sender<DocSnapshot>,
}

impl SyncBroadcaster {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DocSnapshot::default());
        Self { tx }
    }

    /// Replace the current snapshot
    ///
    /// # Returns
    /// The version assigned to the published snapshot
    pub fn publish(&self, docs: Vec<(DocKey, Document)>) -> u64 {
        let docs: Vec<DocEntry> = docs.into_iter().map(DocEntry::from).collect();
        let mut version = 0;

        // send_modify holds the channel lock, so versions never interleave
        self.tx.send_modify(|snapshot| {
            version = snapshot.version + 1;
            *snapshot = DocSnapshot { version, docs };
        });

        version
    }

    pub fn subscribe(&self) -> watch::Receiver<DocSnapshot> {
        self.tx.subscribe()
    }

    /// Copy of the most recently published snapshot
    pub fn latest(&self) -> DocSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SyncBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
