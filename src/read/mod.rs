//! # Read side: subscription set, aggregation reader, snapshot store.
//!
//! This module provides the core read-side types:
//! - [`ChannelSpec`] — one subscribable stream (subject id + value kind)
//! - [`SubscriptionSet`] — validated collection of receive endpoints
//! - [`TelemetryReader`] — the timeout-bounded aggregation read
//! - [`SnapshotStore`] / [`Snapshot`] / [`ReadOutcome`] — the last completed
//!   result map, queryable between reads

mod aggregate;
mod set;
mod snapshot;
mod spec;

pub use aggregate::TelemetryReader;
pub use set::SubscriptionSet;
pub use snapshot::{ReadOutcome, Snapshot, SnapshotStore};
pub use spec::ChannelSpec;
