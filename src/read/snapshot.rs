//! # Last-read snapshot of every configured channel.
//!
//! [`SnapshotStore`] exposes the most recent completed [`Snapshot`] for query
//! at any time, independent of the liveness of the read that produced it.
//!
//! The store is single-writer (the aggregation reader), multi-reader (any
//! number of cloned handles). It is mutated only by wholesale replacement on
//! completion of an aggregation pass, so no reader ever observes a map mixing
//! results from two passes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::transport::SubjectId;

/// Per-channel result of one aggregation pass.
///
/// A timeout is valid domain information — the peer may simply be silent —
/// and is recorded in-band rather than raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadOutcome {
    /// A message arrived before the deadline; carries its payload.
    Value(f64),
    /// The deadline elapsed with no message on this channel.
    Timeout,
}

impl ReadOutcome {
    /// Returns the payload, or `None` for a timeout.
    pub fn value(self) -> Option<f64> {
        match self {
            ReadOutcome::Value(v) => Some(v),
            ReadOutcome::Timeout => None,
        }
    }

    /// True when the channel produced nothing within the deadline.
    pub fn is_timeout(self) -> bool {
        matches!(self, ReadOutcome::Timeout)
    }
}

/// Result map of one aggregation pass.
///
/// After any successful pass the map holds exactly one entry per configured
/// channel — never a partial view.
pub type Snapshot = HashMap<SubjectId, ReadOutcome>;

/// Cloneable handle to the last completed snapshot.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<Mutex<Option<Snapshot>>>,
}

impl SnapshotStore {
    /// Creates an empty store ("no read performed yet").
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the current snapshot, or `None` before the first completed
    /// aggregation read.
    ///
    /// Repeated calls with no intervening read return the identical mapping.
    pub async fn get(&self) -> Option<Snapshot> {
        self.inner.lock().await.clone()
    }

    /// Replaces the stored snapshot wholesale.
    ///
    /// Called only by the aggregation reader. A channel that timed out in
    /// the new pass overwrites its previous value with absence.
    pub(crate) async fn replace(&self, snapshot: Snapshot) {
        *self.inner.lock().await = Some(snapshot);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: u16) -> SubjectId {
        SubjectId::new(id).unwrap()
    }

    #[tokio::test]
    async fn empty_before_first_read() {
        let store = SnapshotStore::new();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn get_is_idempotent() {
        let store = SnapshotStore::new();
        let mut snapshot = Snapshot::new();
        snapshot.insert(subject(1), ReadOutcome::Value(0.5));
        snapshot.insert(subject(2), ReadOutcome::Timeout);
        store.replace(snapshot.clone()).await;

        let first = store.get().await.unwrap();
        let second = store.get().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, snapshot);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = SnapshotStore::new();
        let reader_side = store.clone();

        let mut snapshot = Snapshot::new();
        snapshot.insert(subject(9), ReadOutcome::Value(3.0));
        store.replace(snapshot).await;

        let seen = reader_side.get().await.unwrap();
        assert_eq!(seen[&subject(9)], ReadOutcome::Value(3.0));
    }

    #[test]
    fn outcome_helpers() {
        assert_eq!(ReadOutcome::Value(2.5).value(), Some(2.5));
        assert_eq!(ReadOutcome::Timeout.value(), None);
        assert!(ReadOutcome::Timeout.is_timeout());
        assert!(!ReadOutcome::Value(0.0).is_timeout());
    }
}
