//! # Aggregation reader: one bounded-time pass over every channel.
//!
//! [`TelemetryReader`] produces one complete [`Snapshot`] within a wall-clock
//! budget, tolerating any subset of channels going silent.
//!
//! ## Algorithm
//!
//! ```text
//! aggregate_read(budget):
//!   ├─► empty set?           → Err(NoSubscriptions), store untouched
//!   ├─► for every handle:     issue receive_within(budget)
//!   │       all receives run concurrently on one execution context,
//!   │       sharing the deadline measured from the start of the batch
//!   ├─► join: wait for ALL receives to settle (no early cancel)
//!   │       value arrived    → ReadOutcome::Value(payload)
//!   │       budget elapsed   → ReadOutcome::Timeout   (not an error)
//!   └─► replace the snapshot store wholesale
//!           a timeout overwrites the previous value with absence
//! ```
//!
//! The deadline is shared, not sequential: worst-case latency of a pass stays
//! ~`budget` regardless of channel count.
//!
//! ## Reentrancy
//!
//! `aggregate_read` takes `&mut self`, so overlapping passes on one reader
//! are rejected at compile time. Each pass builds its own set of receive
//! futures; nothing accumulates across calls.

use std::time::Duration;

use futures::future;

use crate::error::{ConfigError, ReadError};
use crate::events::{Bus, Event, EventKind};
use crate::read::{ChannelSpec, ReadOutcome, Snapshot, SnapshotStore, SubscriptionSet};
use crate::transport::Transport;

/// Timeout-bounded aggregation reader over a subscription set.
pub struct TelemetryReader {
    set: SubscriptionSet,
    store: SnapshotStore,
    bus: Bus,
}

impl TelemetryReader {
    /// Wraps an already-configured subscription set.
    pub fn new(set: SubscriptionSet, bus: Bus) -> Self {
        Self {
            set,
            store: SnapshotStore::new(),
            bus,
        }
    }

    /// Validates `specs`, binds the channels, and builds a reader.
    ///
    /// Shorthand for [`SubscriptionSet::configure`] followed by
    /// [`TelemetryReader::new`].
    pub async fn configure(
        transport: &dyn Transport,
        specs: &[ChannelSpec],
        bus: Bus,
    ) -> Result<Self, ConfigError> {
        let set = SubscriptionSet::configure(transport, specs).await?;
        Ok(Self::new(set, bus))
    }

    /// Performs one aggregation pass and returns the new snapshot.
    ///
    /// Concurrently waits up to `budget` on every configured channel, then
    /// replaces the snapshot store wholesale. A silent channel is recorded
    /// as [`ReadOutcome::Timeout`]; it never aborts the pass.
    ///
    /// Fails with [`ReadError::NoSubscriptions`] when the set is empty (never
    /// configured, or closed); the store is left unchanged in that case.
    pub async fn aggregate_read(&mut self, budget: Duration) -> Result<Snapshot, ReadError> {
        if self.set.is_empty() {
            return Err(ReadError::NoSubscriptions);
        }
        self.bus.publish(
            Event::new(EventKind::ReadStarted)
                .with_channels(self.set.len() as u32)
                .with_budget(budget),
        );

        // Per-call future set: all receives share the batch deadline and are
        // polled on this task only.
        let pending = self.set.handles_mut().iter_mut().map(|sub| {
            let subject = sub.subject();
            async move { (subject, sub.receive_within(budget).await) }
        });
        let settled = future::join_all(pending).await;

        let mut snapshot = Snapshot::with_capacity(settled.len());
        let mut timeouts = 0u32;
        for (subject, received) in settled {
            let outcome = match received {
                Some(value) => ReadOutcome::Value(value),
                None => {
                    timeouts += 1;
                    self.bus.publish(
                        Event::new(EventKind::ChannelTimedOut)
                            .with_subject(subject)
                            .with_budget(budget),
                    );
                    ReadOutcome::Timeout
                }
            };
            snapshot.insert(subject, outcome);
        }

        self.store.replace(snapshot.clone()).await;
        self.bus.publish(
            Event::new(EventKind::ReadCompleted)
                .with_channels(snapshot.len() as u32)
                .with_timeouts(timeouts)
                .with_budget(budget),
        );
        Ok(snapshot)
    }

    /// Returns the last completed snapshot, or `None` before the first read.
    pub async fn get_snapshot(&self) -> Option<Snapshot> {
        self.store.get().await
    }

    /// Returns a cloneable handle to the snapshot store for query by other
    /// components.
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    /// Releases every channel handle. Safe to call multiple times; a
    /// subsequent read fails with [`ReadError::NoSubscriptions`].
    pub fn close(&mut self) {
        self.set.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::transport::{Loopback, SubjectId, ValueKind};

    fn subject(id: u16) -> SubjectId {
        SubjectId::new(id).unwrap()
    }

    fn bus() -> Bus {
        Bus::new(64)
    }

    async fn reader(lo: &Loopback, specs: &[ChannelSpec]) -> TelemetryReader {
        TelemetryReader::configure(lo, specs, bus()).await.unwrap()
    }

    #[tokio::test]
    async fn mixed_values_and_silence() {
        let lo = Loopback::new(16);
        let specs = [
            ChannelSpec::new(subject(1111), ValueKind::AngularVelocity),
            ChannelSpec::new(subject(1112), ValueKind::AngularVelocity),
            ChannelSpec::new(subject(1113), ValueKind::Angle),
        ];
        let mut reader = reader(&lo, &specs).await;

        lo.inject(subject(1111), 2.5);
        lo.inject(subject(1113), 0.1);

        let snapshot = reader
            .aggregate_read(Duration::from_millis(200))
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[&subject(1111)], ReadOutcome::Value(2.5));
        assert_eq!(snapshot[&subject(1112)], ReadOutcome::Timeout);
        assert_eq!(snapshot[&subject(1113)], ReadOutcome::Value(0.1));
    }

    #[tokio::test]
    async fn returns_within_budget_with_one_entry_per_channel() {
        let lo = Loopback::new(16);
        let specs = [
            ChannelSpec::new(subject(1), ValueKind::Voltage),
            ChannelSpec::new(subject(2), ValueKind::Voltage),
            ChannelSpec::new(subject(3), ValueKind::Voltage),
            ChannelSpec::new(subject(4), ValueKind::Voltage),
        ];
        let mut reader = reader(&lo, &specs).await;

        let budget = Duration::from_millis(100);
        let started = Instant::now();
        let snapshot = reader.aggregate_read(budget).await.unwrap();
        let elapsed = started.elapsed();

        // All channels are silent, so the pass settles at the shared
        // deadline, not at N sequential deadlines.
        assert!(elapsed >= budget);
        assert!(elapsed < budget * 3, "pass took {elapsed:?}");
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.values().all(|o| o.is_timeout()));
    }

    #[tokio::test]
    async fn value_arriving_mid_pass_is_recorded() {
        let lo = Loopback::new(16);
        let specs = [ChannelSpec::new(subject(5), ValueKind::Angle)];
        let mut reader = reader(&lo, &specs).await;

        let read = reader.aggregate_read(Duration::from_millis(500));
        let inject = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            lo.inject(subject(5), 1.25);
        };
        let (snapshot, ()) = tokio::join!(read, inject);

        assert_eq!(snapshot.unwrap()[&subject(5)], ReadOutcome::Value(1.25));
    }

    #[tokio::test]
    async fn timeout_overwrites_previous_value() {
        let lo = Loopback::new(16);
        let specs = [ChannelSpec::new(subject(8), ValueKind::Voltage)];
        let mut reader = reader(&lo, &specs).await;

        lo.inject(subject(8), 12.0);
        let first = reader
            .aggregate_read(Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(first[&subject(8)], ReadOutcome::Value(12.0));

        // Peer goes silent: the next pass replaces the value with absence.
        let second = reader
            .aggregate_read(Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(second[&subject(8)], ReadOutcome::Timeout);
        assert_eq!(
            reader.get_snapshot().await.unwrap()[&subject(8)],
            ReadOutcome::Timeout
        );
    }

    #[tokio::test]
    async fn closed_reader_fails_and_leaves_store_unchanged() {
        let lo = Loopback::new(16);
        let specs = [ChannelSpec::new(subject(30), ValueKind::Voltage)];
        let mut reader = reader(&lo, &specs).await;

        reader.close();
        let err = reader
            .aggregate_read(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::NoSubscriptions));
        assert!(reader.get_snapshot().await.is_none());
    }

    #[tokio::test]
    async fn snapshot_is_stable_between_reads() {
        let lo = Loopback::new(16);
        let specs = [ChannelSpec::new(subject(77), ValueKind::Angle)];
        let mut reader = reader(&lo, &specs).await;

        lo.inject(subject(77), 0.7);
        reader
            .aggregate_read(Duration::from_millis(100))
            .await
            .unwrap();

        let first = reader.get_snapshot().await.unwrap();
        let second = reader.get_snapshot().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn pass_emits_observability_events() {
        let lo = Loopback::new(16);
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let specs = [ChannelSpec::new(subject(90), ValueKind::Voltage)];
        let mut reader = TelemetryReader::configure(&lo, &specs, bus).await.unwrap();

        reader
            .aggregate_read(Duration::from_millis(30))
            .await
            .unwrap();

        let started = rx.recv().await.unwrap();
        assert_eq!(started.kind, EventKind::ReadStarted);
        let timed_out = rx.recv().await.unwrap();
        assert_eq!(timed_out.kind, EventKind::ChannelTimedOut);
        assert_eq!(timed_out.subject, Some(subject(90)));
        let completed = rx.recv().await.unwrap();
        assert_eq!(completed.kind, EventKind::ReadCompleted);
        assert_eq!(completed.timeouts, Some(1));
    }
}
