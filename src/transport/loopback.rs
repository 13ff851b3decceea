//! # In-process loopback transport.
//!
//! [`Loopback`] routes every transmission through one broadcast hub shared by
//! all endpoints it hands out. It exists so the reader and sender can be
//! exercised without a CAN interface: tests and demos inject traffic with
//! [`Loopback::inject`] and observe it through ordinary subscriptions.
//!
//! Messages sent while a subscription exists are buffered by the hub (up to
//! its capacity), so a value published shortly before an aggregation pass is
//! still delivered within the pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time;

use crate::error::TransportError;

use super::{HEARTBEAT_SUBJECT, Publisher, SubjectId, Subscription, Transport, ValueKind};

/// One message on the loopback hub.
#[derive(Debug, Clone, Copy)]
struct Transfer {
    subject: SubjectId,
    value: f64,
}

/// In-process transport over a broadcast hub.
///
/// Endpoints acquired from one `Loopback` see each other's traffic; separate
/// instances are fully isolated.
pub struct Loopback {
    hub: broadcast::Sender<Transfer>,
    open: Arc<AtomicBool>,
}

impl Loopback {
    /// Creates a hub buffering up to `capacity` in-flight transfers per
    /// subscription.
    pub fn new(capacity: usize) -> Self {
        let (hub, _rx) = broadcast::channel(capacity.max(1));
        Self {
            hub,
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Injects a raw transfer onto the hub, simulating a remote peer.
    pub fn inject(&self, subject: SubjectId, value: f64) {
        let _ = self.hub.send(Transfer { subject, value });
    }

    /// Number of live receive endpoints bound to the hub.
    pub fn subscription_count(&self) -> usize {
        self.hub.receiver_count()
    }
}

#[async_trait]
impl Transport for Loopback {
    async fn subscribe(
        &self,
        _kind: ValueKind,
        subject: SubjectId,
    ) -> Result<Box<dyn Subscription>, TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::Subscribe {
                subject,
                reason: "loopback node is closed".to_string(),
            });
        }
        Ok(Box::new(LoopbackSubscription {
            subject,
            rx: self.hub.subscribe(),
        }))
    }

    async fn publisher(
        &self,
        _kind: ValueKind,
        subject: SubjectId,
    ) -> Result<Box<dyn Publisher>, TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::Publish {
                subject,
                reason: "loopback node is closed".to_string(),
            });
        }
        Ok(Box::new(LoopbackPublisher {
            subject,
            hub: self.hub.clone(),
            open: Arc::clone(&self.open),
        }))
    }

    async fn emit_heartbeat(&self, uptime_ticks: u64) -> Result<(), TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        let _ = self.hub.send(Transfer {
            subject: HEARTBEAT_SUBJECT,
            value: uptime_ticks as f64,
        });
        Ok(())
    }

    async fn start(&self) -> Result<(), TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        Ok(())
    }

    async fn close(&self) {
        // Idempotent: repeated closes are no-ops.
        self.open.store(false, Ordering::SeqCst);
    }
}

struct LoopbackSubscription {
    subject: SubjectId,
    rx: broadcast::Receiver<Transfer>,
}

#[async_trait]
impl Subscription for LoopbackSubscription {
    fn subject(&self) -> SubjectId {
        self.subject
    }

    async fn receive_within(&mut self, budget: Duration) -> Option<f64> {
        let next = async {
            loop {
                match self.rx.recv().await {
                    Ok(t) if t.subject == self.subject => break Some(t.value),
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break None,
                }
            }
        };
        time::timeout(budget, next).await.unwrap_or(None)
    }
}

struct LoopbackPublisher {
    subject: SubjectId,
    hub: broadcast::Sender<Transfer>,
    open: Arc<AtomicBool>,
}

#[async_trait]
impl Publisher for LoopbackPublisher {
    fn subject(&self) -> SubjectId {
        self.subject
    }

    async fn publish(&self, value: f64) -> Result<(), TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        // Fire-and-forget: a hub with no receivers drops the transfer.
        let _ = self.hub.send(Transfer {
            subject: self.subject,
            value,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECT: SubjectId = SubjectId::new(100).unwrap();
    const OTHER: SubjectId = SubjectId::new(101).unwrap();

    #[tokio::test]
    async fn receive_filters_by_subject() {
        let lo = Loopback::new(8);
        let mut sub = lo
            .subscribe(ValueKind::Voltage, SUBJECT)
            .await
            .unwrap();

        lo.inject(OTHER, 1.0);
        lo.inject(SUBJECT, 2.0);

        let got = sub.receive_within(Duration::from_millis(200)).await;
        assert_eq!(got, Some(2.0));
    }

    #[tokio::test]
    async fn receive_times_out_on_silence() {
        let lo = Loopback::new(8);
        let mut sub = lo
            .subscribe(ValueKind::Voltage, SUBJECT)
            .await
            .unwrap();

        let got = sub.receive_within(Duration::from_millis(30)).await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_rejects_new_endpoints() {
        let lo = Loopback::new(8);
        lo.close().await;
        lo.close().await;

        assert!(lo.subscribe(ValueKind::Angle, SUBJECT).await.is_err());
        assert!(lo.publisher(ValueKind::Angle, SUBJECT).await.is_err());
        assert!(matches!(
            lo.emit_heartbeat(1).await,
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn publisher_acquired_before_close_fails_after() {
        let lo = Loopback::new(8);
        let publisher = lo.publisher(ValueKind::Voltage, SUBJECT).await.unwrap();
        assert!(publisher.publish(1.0).await.is_ok());

        lo.close().await;
        assert!(matches!(
            publisher.publish(1.0).await,
            Err(TransportError::Closed)
        ));
    }
}
