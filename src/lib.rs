//! # scalarbus
//!
//! **Scalarbus** reads and writes scalar telemetry values over a
//! Cyphal/UAVCAN-style publish/subscribe bus.
//!
//! It provides two small cores on top of a pluggable transport: a
//! multi-channel, timeout-bounded **aggregation read** that collects the most
//! recent value (or an explicit absence) from every subscribed channel in one
//! bounded pass, and a **publish loop** that forwards externally supplied
//! values on demand while emitting liveness heartbeats on an independent
//! cadence.
//!
//! ## Architecture
//! ```text
//!          bus traffic                         external input
//!              │                                     │
//!              ▼                                     ▼
//! ┌───────────────────────────┐        ┌───────────────────────────┐
//! │ Transport (external seam) │        │       drive() loop        │
//! │  subscribe / publisher /  │        │  poll input ─► set_value  │
//! │      emit_heartbeat       │        │             ─► publish    │
//! └──────┬───────────▲────────┘        │  hb interval ─► tick      │
//!        │           │                 └────────────┬──────────────┘
//!   Subscription  Publisher ◄──────────────────┐    │
//!        │                                     │    │
//!        ▼                                     │    ▼
//! ┌───────────────────────────┐        ┌───────┴───────────────────┐
//! │     SubscriptionSet       │        │      TelemetrySender      │
//! │  (validated handle set)   │        │  SenderState { value,     │
//! └──────────┬────────────────┘        │               uptime }    │
//!            ▼                         └───────────────────────────┘
//! ┌───────────────────────────┐
//! │  TelemetryReader          │   one shared deadline per pass;
//! │  aggregate_read(budget)   │   a silent channel records Timeout,
//! └──────────┬────────────────┘   never an error
//!            ▼
//! ┌───────────────────────────┐
//! │  SnapshotStore            │   wholesale replace; queryable
//! │  subject → ReadOutcome    │   between reads by any caller
//! └───────────────────────────┘
//! ```
//!
//! ## Concurrency model
//!
//! Single-threaded cooperative concurrency. All receives of one aggregation
//! pass are multiplexed on the calling task with one shared deadline; the
//! pass settles only when every channel has either produced a value or timed
//! out — no early cancellation, no torn snapshots. The sender never suspends
//! on the bus beyond the transport's own publish primitive, and its heartbeat
//! cadence is independent of data traffic.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use scalarbus::{
//!     Bus, ChannelSpec, Loopback, NodeConfig, SubjectId, TelemetryReader, ValueKind,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = NodeConfig::default();
//!     let transport = Loopback::new(64);
//!     let bus = Bus::new(cfg.bus_capacity);
//!
//!     let specs = [
//!         ChannelSpec::new(SubjectId::new(1111).unwrap(), ValueKind::AngularVelocity),
//!         ChannelSpec::new(SubjectId::new(1113).unwrap(), ValueKind::Angle),
//!     ];
//!     let mut reader = TelemetryReader::configure(&transport, &specs, bus).await?;
//!
//!     let snapshot = reader.aggregate_read(Duration::from_secs(1)).await?;
//!     for (subject, outcome) in &snapshot {
//!         println!("{subject}: {outcome:?}");
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod read;
mod send;
mod transport;

// ---- Public re-exports ----

pub use config::NodeConfig;
pub use error::{ConfigError, ReadError, TransportError};
pub use events::{Bus, Event, EventKind};
pub use read::{ChannelSpec, ReadOutcome, Snapshot, SnapshotStore, SubscriptionSet, TelemetryReader};
pub use send::{SenderState, TelemetrySender, drive};
pub use transport::{
    HEARTBEAT_SUBJECT, Loopback, Publisher, SubjectId, Subscription, Transport, ValueKind,
};

// Optional: expose a simple built-in stdout listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use events::LogWriter;
