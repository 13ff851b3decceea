//! # Observability events for reads, publishes, and heartbeats.
//!
//! Core components publish [`Event`]s to a [`Bus`] as they work:
//!
//! - the aggregation reader announces each pass and every channel that went
//!   silent within the budget;
//! - the sender announces each transmission and heartbeat tick.
//!
//! Data absence is reported as a plain event, never as an error. Publishing
//! is fire-and-forget: with no subscribers attached the bus drops events and
//! the hot path pays nothing beyond a channel send.

mod bus;
mod event;

#[cfg(feature = "logging")]
mod log;

pub use bus::Bus;
pub use event::{Event, EventKind};

#[cfg(feature = "logging")]
pub use log::LogWriter;
