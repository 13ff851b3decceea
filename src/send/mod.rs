//! # Send side: publish loop and driver.
//!
//! This module provides the write-side types:
//! - [`TelemetrySender`] — holds the current value, republishes it on demand,
//!   and ticks the liveness heartbeat
//! - [`SenderState`] — the sender's exclusively-owned mutable state
//! - [`drive`] — the thin outer loop polling an input source without
//!   blocking the heartbeat cadence

mod driver;
mod sender;

pub use driver::drive;
pub use sender::{SenderState, TelemetrySender};
