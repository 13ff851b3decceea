//! # Transport seam: the external pub/sub collaborator.
//!
//! The scalarbus core does not own a wire protocol. Everything network-facing
//! lives behind three object-safe traits:
//!
//! - [`Transport`] — node lifecycle plus acquisition of channel handles;
//! - [`Subscription`] — a receive endpoint bound to one subject;
//! - [`Publisher`] — a transmit endpoint bound to one subject.
//!
//! A real deployment implements these over a Cyphal/UAVCAN stack (CAN or
//! UDP media, DSDL serialization, register-file configuration). The crate
//! ships [`Loopback`], an in-process implementation over a broadcast hub,
//! which tests and demos run against.
//!
//! ## Identity types
//!
//! [`SubjectId`] is the bus-level channel identifier (0..=8191, the Cyphal
//! subject-id space). [`ValueKind`] tags which scalar DSDL type flows on a
//! subject; the transport uses it to pick the message schema.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

mod loopback;

pub use loopback::Loopback;

/// Fixed subject id of the standard node heartbeat (`uavcan.node.Heartbeat`).
pub const HEARTBEAT_SUBJECT: SubjectId = SubjectId::new(7509).unwrap();

/// A validated Cyphal subject identifier.
///
/// Subject ids occupy the range `0..=8191`. Construction outside that range
/// is rejected, so every `SubjectId` held by the crate is known-valid.
///
/// # Example
/// ```
/// use scalarbus::SubjectId;
///
/// const PORT: SubjectId = SubjectId::new(1111).unwrap();
/// assert_eq!(PORT.get(), 1111);
/// assert!(SubjectId::new(9000).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(u16);

impl SubjectId {
    /// Largest valid subject id.
    pub const MAX: u16 = 8191;

    /// Creates a subject id, returning `None` if `id` is out of range.
    pub const fn new(id: u16) -> Option<Self> {
        if id <= Self::MAX { Some(Self(id)) } else { None }
    }

    /// Returns the raw numeric id.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scalar telemetry type carried on a subject.
///
/// Each kind maps to a fixed-name DSDL scalar type; the payload at this layer
/// is always the unwrapped `f64` field of that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `uavcan.si.sample.angular_velocity.Scalar` (radian per second).
    AngularVelocity,
    /// `uavcan.si.sample.angle.Scalar` (radian).
    Angle,
    /// `uavcan.si.unit.voltage.Scalar` (volt).
    Voltage,
}

impl ValueKind {
    /// Returns the full DSDL type name this kind maps to.
    pub fn dsdl_name(&self) -> &'static str {
        match self {
            ValueKind::AngularVelocity => "uavcan.si.sample.angular_velocity.Scalar.1.0",
            ValueKind::Angle => "uavcan.si.sample.angle.Scalar.1.0",
            ValueKind::Voltage => "uavcan.si.unit.voltage.Scalar.1.0",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dsdl_name())
    }
}

/// # Node-level transport handle.
///
/// Acquires channel endpoints and owns the node lifecycle. Liveness/mode
/// reporting on the bus is the transport's job; the core only supplies the
/// uptime counter value through [`Transport::emit_heartbeat`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Binds a receive endpoint to `subject`.
    async fn subscribe(
        &self,
        kind: ValueKind,
        subject: SubjectId,
    ) -> Result<Box<dyn Subscription>, TransportError>;

    /// Binds a transmit endpoint to `subject`.
    async fn publisher(
        &self,
        kind: ValueKind,
        subject: SubjectId,
    ) -> Result<Box<dyn Publisher>, TransportError>;

    /// Emits one heartbeat message carrying the given uptime counter.
    async fn emit_heartbeat(&self, uptime_ticks: u64) -> Result<(), TransportError>;

    /// Starts bus processing. Endpoints may be acquired before or after.
    async fn start(&self) -> Result<(), TransportError>;

    /// Tears the node down. Safe to call multiple times.
    async fn close(&self);
}

/// # Receive endpoint bound to one subject.
///
/// Owned exclusively by the subscription set that acquired it; released when
/// the set is torn down.
#[async_trait]
pub trait Subscription: Send {
    /// Subject this endpoint is bound to.
    fn subject(&self) -> SubjectId;

    /// Waits up to `budget` for the next message on the subject.
    ///
    /// Returns `None` when the budget elapses with no message. Absence is
    /// domain information, not a failure.
    async fn receive_within(&mut self, budget: Duration) -> Option<f64>;
}

/// # Transmit endpoint bound to one subject.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Subject this endpoint is bound to.
    fn subject(&self) -> SubjectId;

    /// Sends one message. Every call is one discrete bus transmission.
    async fn publish(&self, value: f64) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_range() {
        assert!(SubjectId::new(0).is_some());
        assert!(SubjectId::new(SubjectId::MAX).is_some());
        assert!(SubjectId::new(SubjectId::MAX + 1).is_none());
        assert_eq!(HEARTBEAT_SUBJECT.get(), 7509);
    }

    #[test]
    fn value_kind_names() {
        assert!(ValueKind::AngularVelocity.dsdl_name().contains("angular_velocity"));
        assert!(ValueKind::Angle.dsdl_name().contains("angle"));
        assert!(ValueKind::Voltage.dsdl_name().contains("voltage"));
    }
}
