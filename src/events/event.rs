//! # Runtime events emitted by the reader and sender.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Read events**: aggregation pass flow (started, completed, per-channel
//!   silence).
//! - **Send events**: value transmissions and heartbeat ticks.
//! - **Driver events**: the outer publish loop stopping.
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! subject ids, payload values, and read budgets.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use scalarbus::{Event, EventKind, SubjectId};
//!
//! let ev = Event::new(EventKind::ChannelTimedOut)
//!     .with_subject(SubjectId::new(1112).unwrap())
//!     .with_budget(Duration::from_secs(1));
//!
//! assert_eq!(ev.kind, EventKind::ChannelTimedOut);
//! assert_eq!(ev.subject.map(|s| s.get()), Some(1112));
//! assert_eq!(ev.budget_ms, Some(1000));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::transport::SubjectId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Read events ===
    /// An aggregation pass began.
    ///
    /// Sets:
    /// - `channels`: number of subscribed channels in the pass
    /// - `budget_ms`: shared read budget (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReadStarted,

    /// An aggregation pass settled and the snapshot store was replaced.
    ///
    /// Sets:
    /// - `channels`: number of entries in the new snapshot
    /// - `timeouts`: how many of them are absences
    /// - `budget_ms`: shared read budget (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReadCompleted,

    /// One channel produced nothing within the read budget.
    ///
    /// This is expected domain information (the peer may be silent), not a
    /// failure of the pass.
    ///
    /// Sets:
    /// - `subject`: the silent channel
    /// - `budget_ms`: shared read budget (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ChannelTimedOut,

    // === Send events ===
    /// The sender transmitted its current value.
    ///
    /// Sets:
    /// - `subject`: publication subject
    /// - `value`: transmitted payload
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ValuePublished,

    /// The sender emitted a liveness heartbeat.
    ///
    /// Sets:
    /// - `uptime`: heartbeat uptime counter after the tick
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    HeartbeatTick,

    // === Driver events ===
    /// The publish-loop driver exited (cancellation or input source closed).
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DriverStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Subject id, if the event concerns one channel.
    pub subject: Option<SubjectId>,
    /// Payload value, for transmissions.
    pub value: Option<f64>,
    /// Heartbeat uptime counter.
    pub uptime: Option<u64>,
    /// Read budget in milliseconds (compact).
    pub budget_ms: Option<u32>,
    /// Channel count of an aggregation pass.
    pub channels: Option<u32>,
    /// Absence count of an aggregation pass.
    pub timeouts: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            subject: None,
            value: None,
            uptime: None,
            budget_ms: None,
            channels: None,
            timeouts: None,
        }
    }

    /// Attaches a subject id.
    #[inline]
    pub fn with_subject(mut self, subject: SubjectId) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Attaches a payload value.
    #[inline]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a heartbeat uptime counter.
    #[inline]
    pub fn with_uptime(mut self, uptime: u64) -> Self {
        self.uptime = Some(uptime);
        self
    }

    /// Attaches a read budget (stored as milliseconds).
    #[inline]
    pub fn with_budget(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.budget_ms = Some(ms);
        self
    }

    /// Attaches a channel count.
    #[inline]
    pub fn with_channels(mut self, n: u32) -> Self {
        self.channels = Some(n);
        self
    }

    /// Attaches an absence count.
    #[inline]
    pub fn with_timeouts(mut self, n: u32) -> Self {
        self.timeouts = Some(n);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::ReadStarted);
        let b = Event::new(EventKind::ReadCompleted);
        let c = Event::new(EventKind::DriverStopped);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn budget_saturates_at_u32_max() {
        let ev = Event::new(EventKind::ReadStarted).with_budget(Duration::from_secs(u64::MAX / 2));
        assert_eq!(ev.budget_ms, Some(u32::MAX));
    }
}
