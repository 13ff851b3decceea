//! # Publish loop core: current value, discrete transmissions, heartbeats.
//!
//! [`TelemetrySender`] owns one publication endpoint and a small mutable
//! state. The three operations are independent by design:
//!
//! - [`set_value`](TelemetrySender::set_value) is a pure local mutation;
//! - [`publish_once`](TelemetrySender::publish_once) is one discrete bus
//!   transmission of the current value, with no deduplication;
//! - [`tick_heartbeat`](TelemetrySender::tick_heartbeat) advances the uptime
//!   counter on its own cadence, so the node stays alive on the bus even
//!   when no application data changes.
//!
//! The state is single-writer single-owner. Sharing a sender across driving
//! contexts requires external synchronization; the core assumes one.

use std::sync::Arc;

use crate::error::TransportError;
use crate::events::{Bus, Event, EventKind};
use crate::transport::{Publisher, SubjectId, Transport, ValueKind};

/// Mutable state owned exclusively by the publish loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SenderState {
    /// Value transmitted by the next `publish_once`.
    pub current_value: f64,
    /// Monotonically incremented by each heartbeat tick.
    pub uptime_ticks: u64,
}

/// Publishes a mutable scalar on demand and emits liveness heartbeats.
pub struct TelemetrySender {
    transport: Arc<dyn Transport>,
    publisher: Box<dyn Publisher>,
    state: SenderState,
    bus: Bus,
}

impl TelemetrySender {
    /// Binds a publication endpoint for `subject` and builds a sender around
    /// it. Heartbeat emission stays with `transport`.
    pub async fn bind(
        transport: Arc<dyn Transport>,
        kind: ValueKind,
        subject: SubjectId,
        bus: Bus,
    ) -> Result<Self, TransportError> {
        let publisher = transport.publisher(kind, subject).await?;
        Ok(Self {
            transport,
            publisher,
            state: SenderState::default(),
            bus,
        })
    }

    /// Updates the current value. No I/O happens until `publish_once`.
    pub fn set_value(&mut self, value: f64) {
        self.state.current_value = value;
    }

    /// Returns a copy of the sender state.
    pub fn state(&self) -> SenderState {
        self.state
    }

    /// Subject the sender transmits on.
    pub fn subject(&self) -> SubjectId {
        self.publisher.subject()
    }

    /// Sends the current value through the bound endpoint.
    ///
    /// Every call is one discrete bus transmission; repeated identical
    /// values are not deduplicated.
    pub async fn publish_once(&self) -> Result<(), TransportError> {
        self.publisher.publish(self.state.current_value).await?;
        self.bus.publish(
            Event::new(EventKind::ValuePublished)
                .with_subject(self.publisher.subject())
                .with_value(self.state.current_value),
        );
        Ok(())
    }

    /// Increments the uptime counter and emits one heartbeat carrying it.
    ///
    /// Runs on its own cadence, independent of how often `publish_once` is
    /// invoked.
    pub async fn tick_heartbeat(&mut self) -> Result<(), TransportError> {
        self.state.uptime_ticks += 1;
        self.transport.emit_heartbeat(self.state.uptime_ticks).await?;
        self.bus.publish(
            Event::new(EventKind::HeartbeatTick).with_uptime(self.state.uptime_ticks),
        );
        Ok(())
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }
}
